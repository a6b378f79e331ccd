//! HTTP adapter for the admission controller
//!
//! Enforces the request contract the API server follows (POST with an
//! `application/json` body) and maps pipeline failures onto status codes.
//! Failures are answered with the error text as `text/plain`, not with an
//! AdmissionReview.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use super::review::ReviewError;
use super::WebhookState;

/// The only accepted request media type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Error type for webhook request handling
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Anything other than POST
    #[error("invalid method {0}, only POST requests are allowed")]
    MethodNotAllowed(Method),

    /// Missing or non-JSON content type
    #[error("unsupported content type {0}, only application/json is supported")]
    UnsupportedContentType(String),

    /// The body could not be read in full
    #[error("could not read request body: {0}")]
    ReadBody(String),

    /// Decoding or encoding the review failed
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// The pipeline task did not complete
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::UnsupportedContentType(_) | WebhookError::ReadBody(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Review(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            WebhookError::Review(_) | WebhookError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "error handling webhook request");
        } else {
            warn!(error = %self, "rejected webhook request");
        }

        (status, self.to_string()).into_response()
    }
}

/// Handle an AdmissionReview POST
pub async fn mutate_handler(State(state): State<Arc<WebhookState>>, request: Request) -> Response {
    match serve_admission(&state, request).await {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            )],
            Body::from(body),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Validate the request, then run the controller on its body
///
/// The method is checked before the body is read. Decision functions are
/// synchronous and may block, so the controller runs on the blocking pool.
async fn serve_admission(state: &WebhookState, request: Request) -> Result<Vec<u8>, WebhookError> {
    if request.method() != Method::POST {
        return Err(WebhookError::MethodNotAllowed(request.method().clone()));
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();
    if content_type != JSON_CONTENT_TYPE {
        return Err(WebhookError::UnsupportedContentType(content_type));
    }

    let body = to_bytes(request.into_body(), state.max_body_bytes)
        .await
        .map_err(|e| WebhookError::ReadBody(e.to_string()))?;

    let controller = Arc::clone(&state.controller);
    let encoded = tokio::task::spawn_blocking(move || controller.admit(&body))
        .await
        .map_err(|e| WebhookError::Internal(format!("admission task failed: {e}")))??;

    Ok(encoded)
}

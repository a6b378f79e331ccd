//! AdmissionReview envelope codec
//!
//! Requests are decoded into kube's `AdmissionRequest<DynamicObject>` and
//! answered with kube's `AdmissionResponse`, which copies the request's uid
//! and `apiVersion`/`kind` so the API server can correlate the two. A
//! response is built either by [`allow`] or by [`deny`], never both, so a
//! denial cannot carry a patch.

use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use kube::core::DynamicObject;
use thiserror::Error;

use super::patch::Patch;

/// Errors decoding a review request or encoding a review response
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The body is not an AdmissionReview
    #[error("could not deserialize request: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope has no `request`
    #[error("malformed admission review: request is nil")]
    MissingRequest,

    /// The response could not be serialized
    #[error("could not encode admission response: {0}")]
    Encode(String),
}

impl ReviewError {
    /// Whether the caller sent something we cannot process
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReviewError::Decode(_) | ReviewError::MissingRequest)
    }
}

/// Decode an `admission.k8s.io` AdmissionReview body into its request
///
/// The returned request carries the envelope's `apiVersion`/`kind` in
/// `types`; responses built from it echo them back.
pub fn decode_request(body: &[u8]) -> Result<AdmissionRequest<DynamicObject>, ReviewError> {
    let review: AdmissionReview<DynamicObject> = serde_json::from_slice(body)?;
    review.try_into().map_err(|_| ReviewError::MissingRequest)
}

/// Allow `request`, applying `patch` if it has any operations
///
/// An empty patch leaves `patch` and `patchType` out of the response.
pub fn allow(
    request: &AdmissionRequest<DynamicObject>,
    patch: Patch,
) -> Result<AdmissionResponse, ReviewError> {
    let response = AdmissionResponse::from(request);
    if patch.0.is_empty() {
        return Ok(response);
    }

    response
        .with_patch(patch)
        .map_err(|e| ReviewError::Encode(format!("patch serialization error: {e}")))
}

/// Deny `request` with a user-facing message
pub fn deny(request: &AdmissionRequest<DynamicObject>, message: impl ToString) -> AdmissionResponse {
    AdmissionResponse::from(request).deny(message)
}

/// Encode `response` as the AdmissionReview sent back to the API server
pub fn encode_response(response: AdmissionResponse) -> Result<Vec<u8>, ReviewError> {
    serde_json::to_vec(&response.into_review()).map_err(|e| ReviewError::Encode(e.to_string()))
}

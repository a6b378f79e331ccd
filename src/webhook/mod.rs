//! Mutating admission webhook
//!
//! The API server POSTs an AdmissionReview for every matching CREATE/UPDATE.
//! The request flows through:
//! - [`handler`]: HTTP method/content-type checks, body read, status mapping
//! - [`review`]: AdmissionReview decode/encode
//! - [`controller`]: namespace guard, decision functions, patch aggregation
//!
//! Decision functions implement [`admit::AdmitFunc`] and return
//! [`patch`] operations. [`labels::LabelInjector`] is the built-in one.

pub mod admit;
pub mod controller;
pub mod handler;
pub mod labels;
pub mod namespace;
pub mod patch;
pub mod review;

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};

pub use admit::{AdmitError, AdmitFunc, AdmitResult};
pub use controller::{AdmissionController, AdmissionControllerBuilder, Verdict};
pub use handler::WebhookError;

/// Default path the webhook is served on
pub const DEFAULT_BASE_PATH: &str = "/mutate";

/// Path of the liveness/readiness endpoint
pub const HEALTH_PATH: &str = "/healthz";

/// Shared state for webhook handlers
pub struct WebhookState {
    /// Controller running the registered decision functions
    pub controller: Arc<AdmissionController>,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

impl WebhookState {
    /// Create a new webhook state around a built controller
    pub fn new(controller: AdmissionController, max_body_bytes: usize) -> Self {
        Self {
            controller: Arc::new(controller),
            max_body_bytes,
        }
    }
}

/// Create the webhook router
///
/// - `<base_path>` - AdmissionReview endpoint; every method is routed to the
///   handler so non-POST requests get its 405 rather than a bare one
/// - `GET /healthz` - liveness probe
pub fn webhook_router(state: Arc<WebhookState>, base_path: &str) -> Router {
    Router::new()
        .route(base_path, any(handler::mutate_handler))
        .route(HEALTH_PATH, get(|| async { "ok" }))
        .with_state(state)
}

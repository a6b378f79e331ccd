//! Decision function contract
//!
//! A decision function looks at one admission request and either proposes
//! JSON-patch operations (possibly none) or refuses the object with a reason
//! that is shown to the user. Functions run synchronously and may be called
//! from many requests at once, hence the `Send + Sync` bound.

use kube::core::admission::AdmissionRequest;
use kube::core::DynamicObject;
use thiserror::Error;

use super::patch::PatchOperation;

/// Reason a decision function refused to admit an object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AdmitError {
    message: String,
}

impl AdmitError {
    /// Create a denial with the given user-facing message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result returned by a decision function
pub type AdmitResult = Result<Vec<PatchOperation>, AdmitError>;

/// A pluggable admission decision
pub trait AdmitFunc: Send + Sync {
    /// Decide on `request`, returning the patch operations to apply on success
    fn admit(&self, request: &AdmissionRequest<DynamicObject>) -> AdmitResult;
}

impl<F> AdmitFunc for F
where
    F: Fn(&AdmissionRequest<DynamicObject>) -> AdmitResult + Send + Sync,
{
    fn admit(&self, request: &AdmissionRequest<DynamicObject>) -> AdmitResult {
        self(request)
    }
}

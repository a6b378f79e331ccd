//! Admission controller
//!
//! Holds the ordered decision functions and runs the per-request pipeline:
//! decode, skip Kubernetes-owned namespaces, run every function in
//! registration order, then encode a single allow-with-patch or deny.
//!
//! The function list is fixed once [`AdmissionControllerBuilder::build`]
//! returns, so a controller can be shared behind an `Arc` and read by any
//! number of concurrent requests without locking.

use kube::core::admission::AdmissionRequest;
use kube::core::DynamicObject;
use tracing::{debug, error, info};

use super::admit::AdmitFunc;
use super::namespace::is_protected;
use super::patch::Patch;
use super::review::{self, ReviewError};

/// Outcome of running the decision functions for one request
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// Admit the object, applying the concatenated patch
    Allowed(Patch),
    /// Reject the object
    Denied {
        /// Name the failing function was registered under
        function: String,
        /// Message returned by the failing function
        message: String,
    },
}

struct Registration {
    name: String,
    func: Box<dyn AdmitFunc>,
}

/// Collects decision functions at startup
#[derive(Default)]
pub struct AdmissionControllerBuilder {
    registrations: Vec<Registration>,
}

impl AdmissionControllerBuilder {
    /// Create a builder with no decision functions
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`; functions run in registration order
    pub fn register(mut self, name: impl Into<String>, func: impl AdmitFunc + 'static) -> Self {
        let name = name.into();
        info!(function = %name, "registering admission function");
        self.registrations.push(Registration {
            name,
            func: Box::new(func),
        });
        self
    }

    /// Freeze the registered functions into a controller
    pub fn build(self) -> AdmissionController {
        AdmissionController {
            registrations: self.registrations,
        }
    }
}

/// Runs registered decision functions against admission requests
pub struct AdmissionController {
    registrations: Vec<Registration>,
}

impl AdmissionController {
    /// Start building a controller
    pub fn builder() -> AdmissionControllerBuilder {
        AdmissionControllerBuilder::new()
    }

    /// Names of the registered functions, in the order they run
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.name.as_str())
    }

    /// Decide on an already-decoded request
    ///
    /// Protected namespaces are allowed unchanged without consulting any
    /// function. Otherwise functions run in order and their operations are
    /// appended; the first failure stops the loop and the request is denied
    /// with that failure's message, discarding every operation collected so
    /// far.
    pub fn review(&self, request: &AdmissionRequest<DynamicObject>) -> Verdict {
        if is_protected(request.namespace.as_deref()) {
            debug!(
                uid = %request.uid,
                namespace = ?request.namespace,
                "protected namespace, allowing unchanged"
            );
            return Verdict::Allowed(Patch(Vec::new()));
        }

        let mut ops = Vec::new();
        for registration in &self.registrations {
            match registration.func.admit(request) {
                Ok(patches) => {
                    debug!(
                        uid = %request.uid,
                        function = %registration.name,
                        patch_ops = patches.len(),
                        "admission function allowed"
                    );
                    ops.extend(patches);
                }
                Err(e) => {
                    info!(
                        uid = %request.uid,
                        function = %registration.name,
                        reason = %e,
                        "admission function denied request"
                    );
                    return Verdict::Denied {
                        function: registration.name.clone(),
                        message: e.message().to_string(),
                    };
                }
            }
        }

        Verdict::Allowed(Patch(ops))
    }

    /// Run the full pipeline on a raw AdmissionReview body
    ///
    /// Returns the encoded AdmissionReview response. Denials are successful
    /// responses; only decode and encode failures are errors.
    pub fn admit(&self, body: &[u8]) -> Result<Vec<u8>, ReviewError> {
        let request = review::decode_request(body)?;

        debug!(
            uid = %request.uid,
            namespace = ?request.namespace,
            operation = ?request.operation,
            kind = %request.kind.kind,
            name = ?request.name,
            "handling admission request"
        );

        let encoded = match self.review(&request) {
            Verdict::Allowed(patch) => {
                review::allow(&request, patch).and_then(review::encode_response)
            }
            Verdict::Denied { message, .. } => {
                review::encode_response(review::deny(&request, message))
            }
        };

        encoded.inspect_err(|e| {
            error!(uid = %request.uid, error = %e, "failed to encode admission response");
        })
    }
}

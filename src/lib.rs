//! Mutating admission webhook for Kubernetes
//!
//! The API server calls the webhook synchronously for every matching
//! CREATE/UPDATE. Registered decision functions may deny the object or
//! propose JSON-patch operations; their patches are concatenated in
//! registration order into a single response. Objects in `kube-system` and
//! `kube-public` are never mutated.
//!
//! # Modules
//!
//! - [`webhook`] - Admission pipeline: codec, controller, HTTP adapter
//! - [`config`] - Command line / environment configuration
//! - [`server`] - HTTP(S) server bootstrap
//! - [`telemetry`] - Logging setup
//! - [`error`] - Error types for startup and serving

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod webhook;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

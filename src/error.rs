//! Error types for the admission webhook server

use thiserror::Error;

/// Main error type for server bootstrap and configuration
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// TLS key pair could not be loaded
    #[error("TLS error: {0}")]
    Tls(String),

    /// The HTTP server failed while serving
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a TLS error with the given message
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }
}

//! Server configuration
//!
//! Every option can be given as a flag or through the environment, so the
//! webhook can be configured from a Deployment manifest without args.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::webhook::labels::parse_label;
use crate::webhook::{DEFAULT_BASE_PATH, HEALTH_PATH};

/// Default request body limit (the API server caps objects at 3 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 3 * 1024 * 1024;

/// Mutating admission webhook server
#[derive(Parser, Debug, Clone)]
#[command(name = "admission-webhook", version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8443")]
    pub listen_addr: SocketAddr,

    /// Path the AdmissionReview endpoint is served on
    #[arg(long, env = "BASE_PATH", default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// PEM certificate chain; serves HTTPS when set together with --tls-key-file
    #[arg(long, env = "TLS_CERT_FILE")]
    pub tls_cert_file: Option<PathBuf>,

    /// PEM private key matching --tls-cert-file
    #[arg(long, env = "TLS_KEY_FILE")]
    pub tls_key_file: Option<PathBuf>,

    /// Largest AdmissionReview body accepted, in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Label to inject into admitted objects, as key=value (repeatable)
    #[arg(
        long = "inject-label",
        env = "INJECT_LABELS",
        value_delimiter = ',',
        value_parser = parse_label
    )]
    pub inject_labels: Vec<(String, String)>,
}

/// TLS key pair locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    /// Certificate chain
    pub cert: PathBuf,
    /// Private key
    pub key: PathBuf,
}

impl Config {
    /// Check option combinations clap cannot express
    pub fn validate(&self) -> Result<(), Error> {
        if !self.base_path.starts_with('/') {
            return Err(Error::config(format!(
                "base path '{}' must start with '/'",
                self.base_path
            )));
        }
        if self.base_path == HEALTH_PATH {
            return Err(Error::config(format!(
                "base path must not be {HEALTH_PATH}"
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::config("max body bytes must be greater than zero"));
        }
        self.tls()?;
        Ok(())
    }

    /// TLS files, if HTTPS is configured
    pub fn tls(&self) -> Result<Option<TlsFiles>, Error> {
        match (&self.tls_cert_file, &self.tls_key_file) {
            (Some(cert), Some(key)) => Ok(Some(TlsFiles {
                cert: cert.clone(),
                key: key.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(Error::config(
                "--tls-cert-file and --tls-key-file must be set together",
            )),
        }
    }

    /// Labels for the built-in injector; later duplicates win
    pub fn labels(&self) -> BTreeMap<String, String> {
        self.inject_labels.iter().cloned().collect()
    }
}

#[cfg(test)]
impl Config {
    /// Parse command line flags only; env fallbacks are ignored so tests do
    /// not pick up whatever the surrounding environment sets
    pub(crate) fn from_flags(args: &[&str]) -> Result<Self, clap::Error> {
        use clap::{CommandFactory, FromArgMatches};

        let matches = Self::command()
            .mut_args(|arg| arg.env(Option::<&'static str>::None))
            .try_get_matches_from(std::iter::once("admission-webhook").chain(args.iter().copied()))?;
        Self::from_arg_matches(&matches)
    }
}

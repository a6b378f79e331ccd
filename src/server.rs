//! Webhook server bootstrap

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::webhook::labels::LabelInjector;
use crate::webhook::{webhook_router, AdmissionController, WebhookState};

/// Build the controller with the decision functions enabled by `config`
pub fn build_controller(config: &Config) -> AdmissionController {
    let mut builder = AdmissionController::builder();

    let injector = LabelInjector::new(config.labels());
    if !injector.is_empty() {
        builder = builder.register("label-injector", injector);
    }

    builder.build()
}

/// Serve `controller` until the process is stopped
///
/// Serves HTTPS when a key pair is configured; the API server only calls
/// webhooks over TLS, so plain HTTP is meant for local testing.
pub async fn run(config: Config, controller: AdmissionController) -> Result<(), Error> {
    config.validate()?;

    let names: Vec<String> = controller.function_names().map(str::to_string).collect();
    let state = Arc::new(WebhookState::new(controller, config.max_body_bytes));
    let app = webhook_router(state, &config.base_path);

    match config.tls()? {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .map_err(|e| {
                    Error::tls(format!(
                        "failed to load {} / {}: {e}",
                        tls.cert.display(),
                        tls.key.display()
                    ))
                })?;

            info!(
                addr = %config.listen_addr,
                path = %config.base_path,
                functions = ?names,
                "Starting admission webhook (HTTPS)"
            );
            axum_server::bind_rustls(config.listen_addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!(
                addr = %config.listen_addr,
                path = %config.base_path,
                functions = ?names,
                "Starting admission webhook (plain HTTP)"
            );
            axum_server::bind(config.listen_addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

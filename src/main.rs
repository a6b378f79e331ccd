//! Admission webhook server

use clap::Parser;

use admission_webhook::config::Config;
use admission_webhook::{server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install crypto provider - aws-lc-rs backs rustls for the HTTPS listener
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!("CRITICAL: Failed to install crypto provider: {:?}", e);
        std::process::exit(1);
    }

    telemetry::init_tracing()?;

    let config = Config::parse();

    let controller = server::build_controller(&config);
    server::run(config, controller).await?;

    Ok(())
}

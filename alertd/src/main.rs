use clap::Parser;
use metrics_exporter_statsd::StatsdBuilder;
use notifier::WebhookNotifier;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

/// Relay security-alert reports from client instrumentation to a chat
/// webhook.
#[derive(Parser)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    // Sentry wants to be initialized before the async runtime starts
    let _sentry_guard = config.common.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let Some(metrics_config) = &config.common.metrics {
        let recorder = StatsdBuilder::from(
            metrics_config.statsd_host.as_str(),
            metrics_config.statsd_port,
        )
        .build(Some("alertd"))?;
        metrics::set_global_recorder(recorder)
            .map_err(|e| format!("could not install metrics recorder: {e}"))?;
    }

    if config.ingress.preshared_key.is_none() {
        tracing::warn!("No pre-shared key configured, alert submissions are unauthenticated");
    }
    if config.webhook.is_none() {
        tracing::warn!("No webhook target configured, running in log-only mode");
    }

    serve(config)
}

#[tokio::main]
async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let notifier = Arc::new(WebhookNotifier::new(config.webhook)?);
    ingress::run(config.ingress, notifier).await?;

    Ok(())
}

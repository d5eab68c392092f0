pub mod alert;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod psk;
pub mod service;

use crate::errors::IngressError;
use crate::service::{AlertRouter, IngressService};
use notifier::Notify;
use shared::http::run_http_service;
use std::sync::Arc;

/// Bind the configured listener and serve alert submissions until the
/// process exits.
pub async fn run(config: config::Config, notifier: Arc<dyn Notify>) -> Result<(), IngressError> {
    config.validate()?;
    let config::Config {
        listener,
        preshared_key,
    } = config;

    let router = Arc::new(AlertRouter::new(preshared_key, notifier));
    run_http_service(&listener.host, listener.port, move |peer_addr| {
        IngressService::new(router.clone(), peer_addr.ip())
    })
    .await
}

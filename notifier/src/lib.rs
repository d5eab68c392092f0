use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Delivery failure. Callers treat every variant as the same generic
/// failure; the split only exists for logs.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook target responded with status {0}")]
    Rejected(StatusCode),
}

/// Outbound delivery seam. The ingress handler only sees this trait, so
/// tests can swap in a recording implementation.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Webhook target configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WebhookConfig {
    /// Chat webhook formatted messages are POSTed to
    ///
    /// Note: Uses the `url::Url` type for compile-time URL validation.
    /// Invalid URLs will be rejected during config deserialization.
    pub url: Url,
    /// Display name the message is posted under
    #[serde(default = "default_username")]
    pub username: String,
    /// Display icon the message is posted with
    #[serde(default = "default_icon_emoji")]
    pub icon_emoji: String,
    /// Bound on the complete outbound request/response cycle
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            username: default_username(),
            icon_emoji: default_icon_emoji(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_username() -> String {
    "AlertingBot!".to_string()
}

fn default_icon_emoji() -> String {
    ":robot_face:".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
}

/// Delivers formatted messages to the configured chat webhook.
///
/// With no target configured the notifier runs in log-only mode: every
/// message is logged and reported as delivered without a network call.
pub struct WebhookNotifier {
    client: reqwest::Client,
    target: Option<WebhookConfig>,
}

impl WebhookNotifier {
    pub fn new(target: Option<WebhookConfig>) -> Result<Self, NotifyError> {
        let timeout_secs = target
            .as_ref()
            .map(|t| t.timeout_secs)
            .unwrap_or_else(default_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, target })
    }
}

#[async_trait]
impl Notify for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let Some(target) = &self.target else {
            tracing::info!("No webhook target configured, logging only");
            return Ok(());
        };

        tracing::info!("Sending chat alert");

        let payload = WebhookPayload {
            text: message,
            username: &target.username,
            icon_emoji: &target.icon_emoji,
        };

        let response = self
            .client
            .post(target.url.clone())
            .json(&payload)
            .send()
            .await?;

        // The target's reply is only interesting to operators
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::info!(status = %status, body = %body, "Webhook response");

        if !status.is_success() {
            return Err(NotifyError::Rejected(status));
        }

        Ok(())
    }
}

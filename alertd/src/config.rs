use ingress::config::Config as IngressConfig;
use notifier::WebhookConfig;
use serde::Deserialize;
use std::fs::File;
use url::Url;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Full daemon configuration.
///
/// Everything is optional: with no file and no environment the daemon
/// serves on the default listener, unauthenticated, in log-only mode.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default)]
    pub ingress: IngressConfig,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(EnvOverrides::from_env())?;

        Ok(config)
    }

    /// The environment wins over the file for the two values operators
    /// set per deployment.
    fn apply_overrides(&mut self, overrides: EnvOverrides) -> Result<(), ConfigError> {
        if let Some(preshared_key) = overrides.preshared_key {
            self.ingress.preshared_key = Some(preshared_key);
        }

        if let Some(raw) = overrides.webhook_url {
            let url = Url::parse(&raw)?;
            match &mut self.webhook {
                Some(webhook) => webhook.url = url,
                None => self.webhook = Some(WebhookConfig::new(url)),
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub preshared_key: Option<String>,
    pub webhook_url: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            preshared_key: std::env::var("PRESHARED_KEY").ok(),
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid webhook URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example.com/1
            ingress:
                listener:
                    host: 0.0.0.0
                    port: 8000
                preshared_key: hunter2
            webhook:
                url: https://hooks.example.com/services/T000/B000/XXXX
                username: SecurityBot
                icon_emoji: ":rotating_light:"
                timeout_secs: 3
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.ingress.listener.port, 8000);
        assert_eq!(config.ingress.preshared_key.as_deref(), Some("hunter2"));

        let webhook = config.webhook.expect("webhook config");
        assert_eq!(webhook.username, "SecurityBot");
        assert_eq!(webhook.icon_emoji, ":rotating_light:");
        assert_eq!(webhook.timeout_secs, 3);

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let tmp = write_tmp_file("{}");
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.ingress.listener.host, "0.0.0.0");
        assert_eq!(config.ingress.listener.port, 8000);
        assert_eq!(config.ingress.preshared_key, None);
        assert_eq!(config.webhook, None);
        assert_eq!(config.common.metrics, None);
        assert_eq!(config.common.logging, None);
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        config
            .apply_overrides(EnvOverrides {
                preshared_key: Some("from-env".to_string()),
                webhook_url: Some("https://hooks.example.com/services/T1/B1/Z".to_string()),
            })
            .expect("apply overrides");

        assert_eq!(config.ingress.preshared_key.as_deref(), Some("from-env"));
        let webhook = config.webhook.expect("webhook config");
        assert_eq!(
            webhook.url.as_str(),
            "https://hooks.example.com/services/T1/B1/Z"
        );
        assert_eq!(webhook.username, "AlertingBot!");
    }

    #[test]
    fn webhook_url_override_keeps_display_fields() {
        let yaml = r#"
            webhook:
                url: https://hooks.example.com/services/OLD/OLD/OLD
                username: SecurityBot
            "#;
        let tmp = write_tmp_file(yaml);
        let mut config = Config::from_file(tmp.path()).expect("load config");

        config
            .apply_overrides(EnvOverrides {
                preshared_key: None,
                webhook_url: Some("https://hooks.example.com/services/NEW/NEW/NEW".to_string()),
            })
            .expect("apply overrides");

        let webhook = config.webhook.expect("webhook config");
        assert_eq!(
            webhook.url.as_str(),
            "https://hooks.example.com/services/NEW/NEW/NEW"
        );
        assert_eq!(webhook.username, "SecurityBot");
    }

    #[test]
    fn invalid_webhook_url_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(EnvOverrides {
            preshared_key: None,
            webhook_url: Some("not a url".to_string()),
        });

        assert!(matches!(result, Err(ConfigError::InvalidWebhookUrl(_))));
    }
}

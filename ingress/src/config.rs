use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,
}

/// Ingress configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for inbound alert submissions
    #[serde(default)]
    pub listener: Listener,
    /// Shared secret that alert submissions must present. When unset,
    /// submissions are accepted without authentication.
    #[serde(default)]
    pub preshared_key: Option<String>,
}

impl Config {
    /// Validates the ingress configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Listener {
    /// Validates the listener configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let yaml = r#"
listener:
    host: "127.0.0.1"
    port: 8000
preshared_key: hunter2
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.listener.host, "127.0.0.1");
        assert_eq!(config.listener.port, 8000);
        assert_eq!(config.preshared_key.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 8000);
        assert_eq!(config.preshared_key, None);
    }

    #[test]
    fn test_invalid_port() {
        let config: Config = serde_yaml::from_str("listener: {host: \"0.0.0.0\", port: 0}").unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            ValidationError::InvalidPort
        ));
    }

    #[test]
    fn test_deserialization_errors() {
        // Invalid port type
        assert!(serde_yaml::from_str::<Config>("listener: {port: \"not_a_number\"}").is_err());
    }
}

//! Client configuration.
//!
//! Read from an optional TOML file, then overridden by environment
//! variables.

use std::path::Path;

use serde::Deserialize;

use crate::ClientError;

/// Overrides [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "HACKATHON_SURVEY_BASE_URL";

/// Supplies the access token.
pub const TOKEN_ENV: &str = "HACKATHON_SURVEY_TOKEN";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for [`crate::HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries for transient failures of idempotent requests.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ClientConfig {
    /// Parses a config file's contents. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] on malformed TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ClientError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the config file (if any) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read or
    /// [`ClientError::Config`] if it cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let mut config = match path {
            Some(path) => {
                log::debug!("Reading client config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.is_empty()) {
            self.base_url = base_url;
        }
    }
}

/// The access token from the environment, if set.
#[must_use]
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ClientConfig::from_toml("max_retries = 0\n").unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn environment_overrides_base_url() {
        let mut config = ClientConfig::default();
        config.apply_env(|key| (key == BASE_URL_ENV).then(|| "https://survey.example".to_string()));
        assert_eq!(config.base_url, "https://survey.example");

        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.base_url, "https://survey.example");
    }

    #[test]
    fn rejects_malformed_config() {
        assert!(matches!(
            ClientConfig::from_toml("timeout_secs = \"soon\""),
            Err(ClientError::Config(_))
        ));
    }
}

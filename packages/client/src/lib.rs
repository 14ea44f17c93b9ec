#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the hackathon survey backend.
//!
//! [`HttpClient`] resolves every relative path against the configured base
//! URL and attaches the bearer token to every request except login and
//! registration. Analysis payloads are fetched through the
//! [`AnalysisSource`] trait, which [`FileAnalysisSource`] also implements
//! for offline use.

pub mod analyses;
pub mod config;
pub mod file;
pub mod filters;
pub mod hackathons;
pub mod retry;
pub mod users;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

pub use analyses::AnalysisSource;
pub use config::ClientConfig;
pub use file::FileAnalysisSource;

/// Paths that never receive the bearer token.
const TOKEN_BLACKLIST: &[&str] = &["/users/login", "/users"];

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    /// An upload file has the wrong type.
    #[error("Not a CSV file: {path}")]
    InvalidUpload { path: String },

    /// A preset id cannot be used as a path segment.
    #[error("Invalid filter preset id: {id:?}")]
    InvalidFilterId { id: String },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// A request could not be built.
    #[error(transparent)]
    Analysis(#[from] hackathon_survey_analysis::AnalysisError),
}

/// Client for the backend REST API.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
}

impl HttpClient {
    /// Creates a client without a token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    /// Sets the access token for subsequent requests.
    #[must_use]
    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Replaces (or clears) the access token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL of a relative API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Whether requests to `path` carry the bearer token.
    #[must_use]
    pub fn sends_token(path: &str) -> bool {
        !TOKEN_BLACKLIST.contains(&path)
    }

    /// Starts a request to a relative path, with the token attached when
    /// allowed.
    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.token() {
            Some(token) if Self::sends_token(path) => builder.bearer_auth(token),
            _ => builder,
        }
    }
}

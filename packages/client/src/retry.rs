//! HTTP retry helpers for transient errors.
//!
//! Endpoint methods go through [`send`] or [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so idempotent requests get
//! exponential backoff on connection failures, timeouts, HTTP 429, and
//! HTTP 5xx.
//!
//! ```ignore
//! let analyses: Vec<HackathonAnalysis> =
//!     retry::send_json("/analyses", max_retries, || client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::ClientError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends a request and decodes the JSON body.
///
/// The `build_request` closure is called on each attempt, since builders
/// are consumed by `.send()`.
///
/// # Errors
///
/// Returns [`ClientError::Status`] for a non-success status after all
/// retries, [`ClientError::Http`] for transport failures, and
/// [`ClientError::Json`] if the body does not decode into `T`.
pub async fn send_json<T, F>(
    path: &str,
    max_retries: u32,
    build_request: F,
) -> Result<T, ClientError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let response = send(path, max_retries, build_request).await?;
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::error!(
            "JSON decode failed for {path}\n  \
             received: {} bytes\n  \
             error: {e}\n  \
             body preview: {preview}",
            text.len()
        );
        ClientError::Json(e)
    })
}

/// Sends a request, retrying transient failures up to `max_retries` times.
///
/// Returns the successful response (status 2xx or 3xx). HTTP 4xx other
/// than 429 is permanent and returned immediately.
///
/// # Errors
///
/// Returns [`ClientError::Http`] for transport failures and
/// [`ClientError::Status`] for non-success statuses.
pub async fn send<F>(
    path: &str,
    max_retries: u32,
    build_request: F,
) -> Result<reqwest::Response, ClientError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} for {path} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }
        let retries_left = attempt < max_retries;
        attempt += 1;

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && retries_left {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(ClientError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) && retries_left {
                    log::warn!("  HTTP {status} from {path}");
                    continue;
                }

                if status.is_client_error() || status.is_server_error() {
                    return Err(ClientError::Status {
                        status: status.as_u16(),
                        path: path.to_string(),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt`: 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(6))
}

/// Whether a status is worth retrying (429 or 5xx).
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_rate_limits_and_server_errors_only() {
        assert!(is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(reqwest::StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(reqwest::StatusCode::OK));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
        assert_eq!(backoff(40), Duration::from_secs(64));
    }
}

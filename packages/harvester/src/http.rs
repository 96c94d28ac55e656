//! HTTP client wrapper for downloading article and recital pages.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("aiact-harvester/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Outcome of a page request that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Page body decoded as text.
    Found(String),

    /// Server answered 404.
    NotFound,
}

/// Create a configured HTTP client.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download a page with retry logic.
///
/// Uses exponential backoff for transient failures (network errors, 5xx
/// responses). A 404 is reported as [`Page::NotFound`] so the caller can skip
/// the item; other client errors fail immediately.
pub fn download_page(client: &Client, url: &str) -> Result<Page> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            tracing::debug!(attempt, delay_ms = delay, url, "Retrying after delay");
            thread::sleep(Duration::from_millis(delay));
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        url,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                if status == StatusCode::NOT_FOUND {
                    return Ok(Page::NotFound);
                }

                // Don't retry other client errors (4xx) - they won't succeed
                let response = response.error_for_status()?;
                let bytes = response.bytes()?;
                return Ok(Page::Found(bytes_to_string(&bytes, url)));
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        url,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(HarvesterError::Http(e));
            }
        }
    }

    Err(HarvesterError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Decode a response body as UTF-8, replacing invalid sequences.
///
/// Lossy decoding is logged because replaced characters end up in the
/// input table.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(context, error = %e, "Response is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_bytes_to_string_valid() {
        assert_eq!(bytes_to_string("Article é".as_bytes(), "test"), "Article é");
    }

    #[test]
    fn test_bytes_to_string_lossy() {
        let text = bytes_to_string(&[b'a', 0xff, b'b'], "test");
        assert_eq!(text, "a\u{fffd}b");
    }
}

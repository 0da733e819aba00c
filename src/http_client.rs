//! Shared HTTP request plumbing for provider adapters.
//!
//! Each adapter builds its own `RequestBuilder` (auth schemes differ too much
//! to unify), then hands it here for the common part of the flow: sending,
//! logging, status triage and body reading, with optional retries.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set.
pub struct HttpUtils;

impl HttpUtils {
    /// Sends a request and returns `(status_code, response_body)`.
    ///
    /// HTTP 429 maps to [`ProviderError::RateLimited`] (honoring the
    /// `Retry-After` header) and 502-504 map to
    /// [`ProviderError::NetworkError`]; both are retryable. Other statuses
    /// are returned as-is for the caller to interpret against the body.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Timeout`] or [`ProviderError::NetworkError`] when the
    /// request itself fails.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] -> {method_name} {url_or_action}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_error(provider_name, &e))?;

        let status_code = response.status().as_u16();

        // Retry-After must be read before the body consumes the response.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] rate limited, retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] upstream error, HTTP {status_code}");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("reading response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] <- HTTP {status_code}: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parses a JSON response body into `T`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::ParseError`] when deserialization fails; the raw body
    /// is logged truncated.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!(
                "[{provider_name}] JSON parse failed: {e}, body: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Like [`execute_request`](Self::execute_request), with automatic
    /// retries for transient failures.
    ///
    /// Only network errors, timeouts and rate limits are retried; business
    /// errors (bad credentials, missing records) fail immediately. Delay is
    /// exponential backoff starting at 100ms and capped at 10s, or the
    /// server's `Retry-After` (capped at 30s) when rate limited.
    ///
    /// `max_retries` of 0 disables retrying. Requests whose body cannot be
    /// cloned fall back to a single attempt.
    ///
    /// # Errors
    ///
    /// The last error once all retries are exhausted.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(
                request_builder,
                provider_name,
                method_name,
                url_or_action,
            )
            .await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use, so each attempt needs a clone.
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] request body not cloneable, single attempt only");
                return Self::execute_request(
                    request_builder,
                    provider_name,
                    method_name,
                    url_or_action,
                )
                .await;
            };

            match Self::execute_request(req, provider_name, method_name, url_or_action).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{provider_name}] {method_name} {url_or_action} failed \
                         (attempt {}/{}), next try in {:.1}s: {e}",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: "retries exhausted".to_string(),
        }))
    }
}

/// Maps a transport-level failure from the HTTP stack.
fn transport_error(provider_name: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider_name.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Whether the error is transient and worth retrying.
fn is_retryable(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::NetworkError { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::RateLimited { .. }
    )
}

/// Delay before the next attempt.
///
/// Rate-limit errors with a server-provided `retry_after` use that value
/// (capped at 30s); everything else uses exponential backoff.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, ... capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keep 2^attempt in range
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    let delay_ms = delay_ms.min(10_000);
    Duration::from_millis(delay_ms)
}

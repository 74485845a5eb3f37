//! Single-call dispatch with bounded retry
//!
//! Connection failures and timeouts are retried with a linear backoff:
//! after attempt `n` fails the dispatcher waits `n * backoff` before trying
//! again. Any other transport fault ends the call at once. A received
//! response ends the loop whatever its status.

use serde_json::Value;

use crate::config::{CallPolicy, ClientConfig};
use crate::error::{ProximaError, Result};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportFailure};

/// Sends one call through a [`Transport`] under a [`CallPolicy`]
#[derive(Debug, Clone)]
pub struct RequestDispatcher<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> RequestDispatcher<T> {
    /// Create a dispatcher
    pub const fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Configuration the dispatcher was built with
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request, retrying transient transport failures
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailure` or `Timeout` once all attempts are spent,
    /// or `Transport` as soon as a non-retryable fault occurs
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        policy: CallPolicy,
    ) -> Result<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.config.endpoint_url(path)?,
            body,
            timeout: policy.timeout,
        };

        let max_attempts = policy.attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            tracing::debug!(%method, path, attempt, max_attempts, "dispatching request");

            let error = match self.transport.send(&request).await {
                Ok(response) => return Ok(response),
                Err(TransportFailure::Connect(detail)) => ProximaError::ConnectionFailure {
                    base_url: self.config.base_url().to_owned(),
                    attempt,
                    max_attempts,
                    detail,
                },
                Err(TransportFailure::Timeout) => ProximaError::Timeout {
                    endpoint: path.to_owned(),
                    timeout: policy.timeout,
                    attempt,
                    max_attempts,
                },
                Err(TransportFailure::Other(detail)) => {
                    return Err(ProximaError::Transport(detail));
                }
            };

            if attempt < max_attempts {
                let delay = policy.backoff.saturating_mul(attempt);
                tracing::warn!(%method, path, attempt, max_attempts, ?delay, error = %error, "retrying request");
                tokio::time::sleep(delay).await;
            }

            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| ProximaError::Transport("no attempt was made".to_owned())))
    }
}

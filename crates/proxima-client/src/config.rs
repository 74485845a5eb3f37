use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{ProximaError, Result};

/// Default gateway address
pub const DEFAULT_BASE_URL: &str = "http://localhost:3210";

/// Model sentinel that lets the server pick
pub const DEFAULT_MODEL: &str = "auto";

/// Deadline for chat calls
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Deadline for models, functions, stats and conversation calls
pub const DEFAULT_AUXILIARY_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempt bound per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Linear backoff step between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Timeout and retry settings for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    /// Per-attempt deadline
    pub timeout: Duration,
    /// Maximum number of attempts, clamped to at least one
    pub max_retries: u32,
    /// Wait `attempt * backoff` after a retryable failure
    pub backoff: Duration,
}

impl CallPolicy {
    /// Number of attempts the dispatcher will make
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Immutable client configuration
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<SecretString>,
    default_model: String,
    chat_timeout: Duration,
    auxiliary_timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    ///
    /// Trailing slashes are stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute `http` or `https` URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');

        let parsed = Url::parse(base_url)
            .map_err(|e| ProximaError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProximaError::Config(format!(
                "unsupported scheme '{}' in base URL",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            auxiliary_timeout: DEFAULT_AUXILIARY_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Set the bearer token attached to every call
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model used when a call does not name one
    ///
    /// An empty identifier keeps the current default.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.is_empty() {
            self.default_model = model;
        }
        self
    }

    /// Set the chat call deadline
    #[must_use]
    pub const fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    /// Set the auxiliary call deadline
    #[must_use]
    pub const fn with_auxiliary_timeout(mut self, timeout: Duration) -> Self {
        self.auxiliary_timeout = timeout;
        self
    }

    /// Set the attempt bound
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the linear backoff step
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token, if any
    pub const fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    /// Model used when a call does not name one
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Policy for `POST /v1/chat/completions`
    pub const fn chat_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: self.chat_timeout,
            max_retries: self.max_retries,
            backoff: self.backoff,
        }
    }

    /// Policy for the auxiliary endpoints
    pub const fn auxiliary_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: self.auxiliary_timeout,
            max_retries: self.max_retries,
            backoff: self.backoff,
        }
    }

    /// Build the absolute URL for an endpoint path
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let joined = format!("{}{path}", self.base_url);
        Url::parse(&joined).map_err(|e| ProximaError::Config(format!("invalid endpoint URL '{joined}': {e}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            auxiliary_timeout: DEFAULT_AUXILIARY_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("chat_timeout", &self.chat_timeout)
            .field("auxiliary_timeout", &self.auxiliary_timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_point_at_local_gateway() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url(), "http://localhost:3210");
        assert_eq!(config.default_model(), "auto");
        assert!(config.api_key().is_none());
        assert_eq!(config.chat_policy().timeout, Duration::from_secs(120));
        assert_eq!(config.auxiliary_policy().timeout, Duration::from_secs(30));
        assert_eq!(config.chat_policy().max_retries, 3);
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("http://proxima.local:8080//").unwrap();
        assert_eq!(config.base_url(), "http://proxima.local:8080");
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let config = ClientConfig::new("http://proxima.local/gateway/").unwrap();
        let url = config.endpoint_url("/v1/models").unwrap();
        assert_eq!(url.as_str(), "http://proxima.local/gateway/v1/models");
    }

    #[test]
    fn rejects_relative_url() {
        let err = ClientConfig::new("localhost").unwrap_err();
        assert!(matches!(err, ProximaError::Config(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://proxima.local").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn empty_default_model_is_ignored() {
        let config = ClientConfig::default().with_default_model("");
        assert_eq!(config.default_model(), "auto");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::default().with_api_key("sk-very-secret".to_owned());

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(config.api_key().unwrap().expose_secret(), "sk-very-secret");
    }

    #[test]
    fn zero_retries_still_attempts_once() {
        let policy = ClientConfig::default().with_max_retries(0).chat_policy();
        assert_eq!(policy.attempts(), 1);
    }
}

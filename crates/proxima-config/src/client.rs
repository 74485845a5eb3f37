use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// `[client]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Gateway address
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model used when a call does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Chat call deadline
    #[serde(default = "default_timeout", deserialize_with = "duration")]
    pub timeout: Duration,
    /// Deadline for models, functions, stats and conversation calls
    #[serde(default = "default_auxiliary_timeout", deserialize_with = "duration")]
    pub auxiliary_timeout: Duration,
    /// Attempts per call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff step
    #[serde(default = "default_backoff", deserialize_with = "duration")]
    pub backoff: Duration,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            default_model: default_model(),
            timeout: default_timeout(),
            auxiliary_timeout: default_auxiliary_timeout(),
            max_retries: default_max_retries(),
            backoff: default_backoff(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3210".to_owned()
}

fn default_model() -> String {
    "auto".to_owned()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

const fn default_auxiliary_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff() -> Duration {
    Duration::from_secs(1)
}

/// Parse human-readable durations such as `"90s"` or `"2m"`
fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

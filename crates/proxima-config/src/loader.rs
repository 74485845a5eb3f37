use std::io::ErrorKind;
use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load configuration if the file exists, defaults otherwise
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] for a file that exists
    pub fn load_if_present(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file {}: {e}", path.display())),
        }
    }

    /// Parse configuration text
    ///
    /// Expands `{{ env.VAR }}` placeholders, then deserializes and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        let client = &self.client;

        let url = url::Url::parse(&client.base_url)
            .map_err(|e| anyhow::anyhow!("client.base_url '{}' is not a valid URL: {e}", client.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("client.base_url must use http or https, found '{}'", url.scheme());
        }

        if client.max_retries == 0 {
            anyhow::bail!("client.max_retries must be at least 1");
        }

        if client.timeout.is_zero() || client.auxiliary_timeout.is_zero() {
            anyhow::bail!("client timeouts must be greater than 0");
        }

        if client.api_key.as_ref().is_some_and(|key| key.expose_secret().is_empty()) {
            anyhow::bail!("client.api_key must not be empty when set");
        }

        Ok(())
    }
}

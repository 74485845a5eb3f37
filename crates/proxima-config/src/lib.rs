#![allow(clippy::must_use_candidate)]

//! Configuration file for the `proxima` command-line client

pub mod client;
mod env;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use client::ClientSection;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Gateway connection settings
    #[serde(default)]
    pub client: ClientSection,
    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

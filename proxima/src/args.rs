use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

/// Proxima AI gateway client
#[derive(Debug, Parser)]
#[command(name = "proxima", about = "Talk to every AI provider behind a Proxima gateway")]
pub struct Args {
    /// Path to configuration file (default: ./proxima.toml if present)
    #[arg(short, long, env = "PROXIMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the gateway address
    #[arg(long, env = "PROXIMA_BASE_URL")]
    pub base_url: Option<String>,

    /// Override the API key
    #[arg(long, env = "PROXIMA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the default model (`auto` lets the gateway choose)
    #[arg(short, long, env = "PROXIMA_MODEL")]
    pub model: Option<String>,

    /// Log filter directive, e.g. `proxima_client=debug`
    #[arg(long)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message through the unified endpoint
    Chat(ChatArgs),
    /// List available models and their status
    Models,
    /// Show the function catalog
    Functions,
    /// Show response time statistics per provider
    Stats,
    /// Start fresh conversations for all providers
    NewConversation,
}

#[derive(Debug, clap::Args)]
pub struct ChatArgs {
    /// Message or prompt
    #[arg(default_value = "")]
    pub message: String,

    /// Server function: chat, search, translate, brainstorm, code, analyze
    #[arg(short, long)]
    pub function: Option<String>,

    /// Extra parameter as `key=value`; values that parse as JSON are sent as JSON
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// Source language for translations
    #[arg(long)]
    pub from_lang: Option<String>,

    /// Print the full JSON response instead of the text
    #[arg(long)]
    pub json: bool,
}

/// Parse `key=value`, keeping non-JSON values as strings
fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));

    Ok((key.to_owned(), value))
}

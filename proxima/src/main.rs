#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::path::Path;

use args::{Args, ChatArgs, Command};
use clap::Parser;
use proxima_client::{ChatParams, ClientConfig, ProximaClient};
use proxima_config::{ClientSection, Config};

/// Config file picked up from the working directory
const DEFAULT_CONFIG: &str = "proxima.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_if_present(Path::new(DEFAULT_CONFIG))?,
    };

    proxima_telemetry::init(&config.telemetry, args.log_filter.as_deref())?;

    let client_config = client_config(&config.client, &args)?;

    tracing::debug!(
        base_url = client_config.base_url(),
        default_model = client_config.default_model(),
        "starting proxima"
    );

    let client = ProximaClient::new(client_config)?;

    tokio::select! {
        result = run(&client, args.command) => result,
        () = interrupted() => anyhow::bail!("interrupted"),
    }
}

/// Merge the config file with command-line overrides
fn client_config(section: &ClientSection, args: &Args) -> anyhow::Result<ClientConfig> {
    let base_url = args.base_url.as_deref().unwrap_or(&section.base_url);

    let mut config = ClientConfig::new(base_url)?
        .with_default_model(args.model.as_deref().unwrap_or(&section.default_model))
        .with_chat_timeout(section.timeout)
        .with_auxiliary_timeout(section.auxiliary_timeout)
        .with_max_retries(section.max_retries)
        .with_backoff(section.backoff);

    if let Some(ref key) = args.api_key {
        config = config.with_api_key(key.clone());
    } else if let Some(ref key) = section.api_key {
        config = config.with_api_key(key.clone());
    }

    Ok(config)
}

async fn run(client: &ProximaClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Chat(chat) => {
            let json = chat.json;
            let response = client.chat(chat_params(chat)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(response.raw())?);
            } else {
                println!("{response}");
            }

            tracing::info!(
                model = response.model(),
                provider = response.provider(),
                response_time_ms = response.response_time_ms(),
                "chat completed"
            );
        }
        Command::Models => print_json(&client.list_models().await?)?,
        Command::Functions => print_json(&client.list_functions().await?)?,
        Command::Stats => print_json(&client.stats().await?)?,
        Command::NewConversation => print_json(&client.new_conversation().await?)?,
    }

    Ok(())
}

fn chat_params(chat: ChatArgs) -> ChatParams {
    let mut params = ChatParams::new(chat.message);

    if let Some(function) = chat.function {
        params = params.function(function);
    }

    for (key, value) in chat.params {
        params = params.param(key, value);
    }

    if let Some(language) = chat.from_lang {
        params = params.from_lang(language);
    }

    params
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve on Ctrl+C so an in-flight call can be abandoned
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never resolve
        std::future::pending::<()>().await;
    }

    tracing::info!("interrupt received");
}

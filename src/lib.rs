pub mod cli;
pub mod client;
pub mod config;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use llm::{ new_backend, BackendConfig, UpstreamMode };
use log::{ info, warn };
use relay::{ CompletionDefaults, EnvCredential, RelayHandler };
use server::Server;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the relay from parsed arguments without binding a socket.
pub fn build_relay(args: &Args) -> Result<RelayHandler, Box<dyn Error + Send + Sync>> {
    let mode: UpstreamMode = args.relay_mode.parse()?;
    let target = match mode {
        UpstreamMode::Upstream => args.upstream_url.as_str(),
        UpstreamMode::Forward =>
            args.forward_url
                .as_deref()
                .ok_or("RELAY_MODE=forward requires FORWARD_URL")?,
    };
    let url = Url::parse(target).map_err(|e| format!("Invalid {} URL '{}': {}", mode, target, e))?;

    let backend = new_backend(
        &(BackendConfig {
            mode,
            url,
            timeout: args.upstream_timeout_secs.map(Duration::from_secs),
        })
    )?;
    let credentials = EnvCredential::new(args.api_key_env.clone());
    if backend.requires_credential() && std::env::var(credentials.var()).is_err() {
        warn!(
            "{} is not set; requests will fail with 500 until it is configured",
            credentials.var()
        );
    }

    Ok(
        RelayHandler::new(backend, Arc::new(credentials))
            .with_defaults(CompletionDefaults {
                model: args.chat_model.clone(),
                max_tokens: args.max_tokens,
                temperature: args.temperature,
            })
            .with_raw(args.include_raw)
    )
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Relay Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Relay Mode: {}", args.relay_mode);
    info!("Upstream URL: {}", args.upstream_url);
    if let Some(forward_url) = &args.forward_url {
        info!("Forward URL: {}", forward_url);
    }
    info!("API Key Variable: {}", args.api_key_env);
    info!("Default Model: {}", args.chat_model);
    info!("Default Max Tokens: {}", args.max_tokens);
    info!("Default Temperature: {}", args.temperature);
    info!("Include Raw Upstream JSON: {}", args.include_raw);
    match args.upstream_timeout_secs {
        Some(secs) => info!("Upstream Timeout: {}s", secs),
        None => info!("Upstream Timeout: none"),
    }
    info!("TLS Enabled: {}", args.enable_tls);
    info!("---------------------------");

    let relay = Arc::new(build_relay(&args)?);
    info!("Relaying via {} backend to {}", relay.backend().name(), relay.backend().endpoint());

    let server = Server::new(args.server_addr.clone(), relay, args);
    server.run().await?;

    Ok(())
}

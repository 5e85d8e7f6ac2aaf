//! Chat relay that broadcasts exchange rate reports on request

use clap::Parser;
use rate_relay::command_log::CommandLog;
use rate_relay::config::Config;
use rate_relay::handler::Relay;
use rate_relay::rates::{PrivatBankClient, RateFetcher};
use rate_relay::registry::create_shared_registry;
use rate_relay::server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!("Starting rate relay");
    tracing::info!("Upstream: {} (timeout: {:?})", config.api_url, config.fetch_timeout());
    tracing::info!("Command log: {}", config.command_log.display());

    let client = PrivatBankClient::new(config.api_url.clone(), config.fetch_timeout())?;
    let relay = Relay::new(
        create_shared_registry(),
        RateFetcher::new(Arc::new(client)),
        CommandLog::new(config.command_log.clone()),
    );

    server::start_server(&config.addr, Arc::new(relay)).await?;

    Ok(())
}

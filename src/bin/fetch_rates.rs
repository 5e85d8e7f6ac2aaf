//! One-shot exchange rate fetch printed as JSON

use clap::Parser;
use rate_relay::config::timeout_from_secs;
use rate_relay::rates::{PrivatBankClient, RateFetcher, PRIVATBANK_ARCHIVE_URL};
use rate_relay::types::{ExchangeQuery, DEFAULT_CURRENCIES};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fetch-rates", version, about = "Fetch exchange rates for the last N days")]
struct Args {
    /// Number of days, today included (1-10)
    days: u64,

    /// Comma-separated currency codes
    #[arg(long, value_delimiter = ',', default_values_t = default_currencies())]
    currencies: Vec<String>,

    /// Base URL of the exchange-rate archive API
    #[arg(long, env = "RELAY_API_URL", default_value = PRIVATBANK_ARCHIVE_URL)]
    api_url: String,

    /// Per-request timeout in seconds, 0 to disable
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn default_currencies() -> Vec<String> {
    DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let query = match ExchangeQuery::new(args.days, &args.currencies) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let client = PrivatBankClient::new(args.api_url, timeout_from_secs(args.timeout_secs))?;
    let result = RateFetcher::new(Arc::new(client)).fetch(&query).await?;

    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}

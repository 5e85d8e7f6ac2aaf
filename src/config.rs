use crate::rates::PRIVATBANK_ARCHIVE_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Server settings; every flag can also come from the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "rate-relay", version, about = "Chat relay with exchange rate reports")]
pub struct Config {
    /// Address the WebSocket server binds to
    #[arg(long, env = "RELAY_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: String,

    /// Base URL of the exchange-rate archive API
    #[arg(long, env = "RELAY_API_URL", default_value = PRIVATBANK_ARCHIVE_URL)]
    pub api_url: String,

    /// File that accepted exchange commands are appended to
    #[arg(long, env = "RELAY_COMMAND_LOG", default_value = "exchange_commands.log")]
    pub command_log: PathBuf,

    /// Per-request upstream timeout in seconds, 0 to disable
    #[arg(long, env = "RELAY_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.fetch_timeout_secs)
    }
}

/// `0` means no timeout
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["rate-relay"]).unwrap();
        assert_eq!(config.api_url, PRIVATBANK_ARCHIVE_URL);
        assert_eq!(config.command_log, PathBuf::from("exchange_commands.log"));
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_flags_override() {
        let config = Config::try_parse_from([
            "rate-relay",
            "--addr",
            "0.0.0.0:9000",
            "--fetch-timeout-secs",
            "0",
        ])
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.fetch_timeout(), None);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(3), Some(Duration::from_secs(3)));
    }
}

use thiserror::Error;

use crate::types::MAX_DAYS;

/// Failure of a single upstream fetch. One of these fails the whole batch.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Error fetching data for {date}: {status}")]
    Status { date: String, status: u16 },

    #[error("Error fetching data for {date}: {source}")]
    Request {
        date: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response for {date}: {reason}")]
    Malformed { date: String, reason: String },
}

/// Malformed `exchange` invocations. `Display` is the reply sent to the sender.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command format. Use 'exchange' or 'exchange <days>'")]
    Format,

    #[error("Error: Number of days should be between 1 and {max}.", max = MAX_DAYS)]
    Range(u64),
}

/// Transport-level failures; each one ends only its own connection
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_messages() {
        assert_eq!(
            CommandError::Range(11).to_string(),
            "Error: Number of days should be between 1 and 10."
        );
        assert_eq!(
            CommandError::Format.to_string(),
            "Invalid command format. Use 'exchange' or 'exchange <days>'"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = UpstreamError::Status {
            date: "17.10.2026".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "Error fetching data for 17.10.2026: 500");
    }
}

use crate::types::LOG_TIMESTAMP_FORMAT;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Append-only log of accepted exchange commands
#[derive(Debug, Clone)]
pub struct CommandLog {
    path: PathBuf,
}

impl CommandLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp>: <command>` as one line
    pub async fn append(&self, at: DateTime<Local>, command: &str) -> std::io::Result<()> {
        let line = format!("{}: {}\n", at.format(LOG_TIMESTAMP_FORMAT), command);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

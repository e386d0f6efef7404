//! Runtime configuration shared by both client binaries.

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const PLAYER_TOKEN_FILE: &str = "token";
pub const ADMIN_TOKEN_FILE: &str = "admin-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub token_file: PathBuf,
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Falls back to `default_token_file(file_name)` when no path is given.
    pub fn new(
        server_url: impl Into<String>,
        token_file: Option<PathBuf>,
        file_name: &str,
        poll_interval: Duration,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            token_file: token_file.unwrap_or_else(|| default_token_file(file_name)),
            poll_interval,
        }
    }
}

/// `$HOME/.numberhunt/<file_name>`, or relative to the working directory
/// when `HOME` is unset.
pub fn default_token_file(file_name: &str) -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".numberhunt").join(file_name)
}

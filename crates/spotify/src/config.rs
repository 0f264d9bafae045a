// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the integration secrets file, relative to the working directory.
pub const DEFAULT_SECRETS_PATH: &str = "config/integration.secrets.json";

/// Primary env var for the secrets file, also settable with `--secrets-path`.
pub const SECRETS_PATH_ENV: &str = "INTEGRATION_SECRETS_PATH";

/// Secondary env var consulted for the secrets file when `INTEGRATION_SECRETS_PATH` is unset.
pub const SECRETS_PATH_ALIAS_ENV: &str = "INTEGRATIONS_SECRETS_PATH";

/// Configuration for the Spotify gateway client.
#[derive(Debug, Clone, clap::Args)]
pub struct GatewayConfig {
    /// Base URL of the Spotify Web API.
    #[arg(long, default_value = "https://api.spotify.com/v1", env = "SPOTIFY_API_BASE")]
    pub api_base: String,

    /// OAuth token endpoint used for refresh-token exchanges.
    #[arg(long, default_value = "https://accounts.spotify.com/api/token", env = "SPOTIFY_TOKEN_URL")]
    pub token_url: String,

    /// Timeout for every outbound request, in milliseconds.
    #[arg(long, default_value_t = 10_000, env = "SPOTIFY_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Integration id used to select an entry in the secrets file.
    #[arg(long, default_value = "spotify", env = "SPOTIFY_INTEGRATION_ID")]
    pub integration_id: String,

    /// Path to the integration secrets JSON file.
    #[arg(long, env = "INTEGRATION_SECRETS_PATH")]
    pub secrets_path: Option<PathBuf>,

    /// Log format (json or text).
    #[arg(long, env = "SPOTIFY_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "SPOTIFY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the secrets file path.
    ///
    /// Checks `--secrets-path` / `INTEGRATION_SECRETS_PATH`, then
    /// `INTEGRATIONS_SECRETS_PATH`, then [`DEFAULT_SECRETS_PATH`]. Values are
    /// trimmed and blank ones skipped.
    pub fn secrets_path(&self) -> PathBuf {
        if let Some(path) = self.secrets_path.as_deref().and_then(non_blank_path) {
            return path;
        }
        if let Some(path) = std::env::var_os(SECRETS_PATH_ALIAS_ENV)
            .as_deref()
            .and_then(|p| non_blank_path(Path::new(p)))
        {
            return path;
        }
        PathBuf::from(DEFAULT_SECRETS_PATH)
    }

    /// Join an API path onto the configured base with exactly one `/` between them.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Trimmed copy of `path`, or `None` if blank. Non-UTF-8 paths are kept as-is.
fn non_blank_path(path: &Path) -> Option<PathBuf> {
    match path.to_str() {
        Some(raw) => {
            let raw = raw.trim();
            (!raw.is_empty()).then(|| PathBuf::from(raw))
        }
        None => Some(path.to_path_buf()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

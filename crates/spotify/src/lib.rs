// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spotify gateway: cached OAuth tokens and authenticated Web API calls.

pub mod cli;
pub mod commands;
pub mod config;
pub mod credential;
pub mod error;
pub mod playback;
pub mod token;
pub mod upstream;

#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use reqwest::Method;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{Cli, Command};
use crate::error::ProxyError;
use crate::playback::{passthrough, reply_for_state, PlaybackCache, Reply};
use crate::upstream::client::{ProxyCall, SpotifyClient};

/// Exit code when the integration is not configured.
pub const EXIT_NOT_CONFIGURED: i32 = 2;

/// Run one CLI command and return the process exit code.
pub async fn run(cli: Cli) -> anyhow::Result<i32> {
    let client = match SpotifyClient::from_config(&cli.config) {
        Ok(client) => client,
        Err(e) => {
            warn!("spotify integration disabled: {e}");
            return Ok(EXIT_NOT_CONFIGURED);
        }
    };

    match cli.command {
        Command::Call { method, path, query, body } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut call = ProxyCall::new(method, path);
            for (key, value) in query {
                call = call.query(key, value);
            }
            if let Some(ref raw) = body {
                call = call.json(serde_json::from_str(raw)?);
            }
            let result = client.call(&call).await;
            let code = if result.is_success() { 0 } else { 1 };
            print_reply(&passthrough(result));
            Ok(code)
        }
        Command::Watch { interval_ms } => {
            let shutdown = CancellationToken::new();
            let sd = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    sd.cancel();
                }
            });
            watch(&client, Duration::from_millis(interval_ms.max(1)), &shutdown).await;
            Ok(0)
        }
    }
}

/// Poll the playback state until `shutdown` fires, printing each reply.
///
/// Replies go through [`reply_for_state`], so a missing device shows the
/// last known state instead of an error.
pub async fn watch(client: &SpotifyClient, every: Duration, shutdown: &CancellationToken) {
    let cache = PlaybackCache::new();
    let state = commands::state();
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let result = client.call_until(&state, shutdown).await;
        if matches!(result.error, Some(ProxyError::Cancelled)) {
            break;
        }
        print_reply(&reply_for_state(result, &cache));
    }
    info!(refreshes = client.tokens().refresh_count(), "watch stopped");
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.status);
    if !reply.body.is_empty() {
        println!("{}", String::from_utf8_lossy(&reply.body));
    }
}

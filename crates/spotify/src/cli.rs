// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface of the `spotify-gateway` binary.

use clap::{Parser, Subcommand};

use crate::config::GatewayConfig;

#[derive(Debug, Parser)]
#[command(name = "spotify-gateway", version, about = "Authenticated Spotify Web API proxy")]
pub struct Cli {
    #[command(flatten)]
    pub config: GatewayConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue one API call and print the status and body
    Call {
        /// HTTP method (GET, PUT, POST, ...)
        method: String,
        /// API path relative to the base URL (e.g. /me/player)
        path: String,
        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", short = 'q', value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
    /// Poll the playback state until interrupted
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 5000)]
        interval_ms: u64,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

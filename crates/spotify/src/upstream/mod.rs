// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream Spotify communication: authenticated proxy client and failure classification.

pub mod classify;
pub mod client;

use std::sync::Once;
use std::time::Duration;

use crate::error::ConfigError;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times; only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the shared outbound HTTP client. Every request it sends is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    ensure_crypto();
    reqwest::Client::builder().timeout(timeout).build().map_err(ConfigError::HttpClient)
}

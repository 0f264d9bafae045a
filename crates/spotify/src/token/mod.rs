// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-token cache for the Spotify client.
//!
//! One [`TokenCache`] per client instance holds the current bearer token
//! behind a mutex. The lock covers only the freshness check and the
//! post-refresh write, never the exchange itself, so a slow token endpoint
//! does not block readers. Callers that both observe a stale token each run
//! their own exchange; the last write wins and every written token is valid.

pub mod refresh;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::RefreshError;

pub use refresh::{TokenGrant, TokenRefresher, TokenResponse, DEFAULT_TOKEN_LIFETIME};

/// A cached token is reused only while `now < expires_at - EXPIRY_SKEW`.
pub const EXPIRY_SKEW: Duration = Duration::from_secs(30);

/// Current access token. An empty token means none has been fetched yet.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: String,
    pub expires_at: Option<Instant>,
}

impl TokenState {
    /// Whether the token may be reused at `now`.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at.and_then(|at| at.checked_sub(EXPIRY_SKEW)) {
            Some(deadline) => now < deadline,
            None => false,
        }
    }
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.access_token.is_empty() { "<none>" } else { "<redacted>" };
        f.debug_struct("TokenState")
            .field("access_token", &token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct TokenCache {
    state: Mutex<TokenState>,
    refresher: TokenRefresher,
    refreshes: AtomicU64,
}

impl TokenCache {
    pub fn new(refresher: TokenRefresher) -> Self {
        Self { state: Mutex::new(TokenState::default()), refresher, refreshes: AtomicU64::new(0) }
    }

    /// Return a usable token, refreshing first if the cached one is absent or near expiry.
    pub async fn valid_token(&self) -> Result<String, RefreshError> {
        if let Some(token) = self.cached(Instant::now()) {
            return Ok(token);
        }
        self.refresh().await
    }

    /// Run one exchange and store the result. The cached state is untouched on failure.
    pub async fn refresh(&self) -> Result<String, RefreshError> {
        let grant = match self.refresher.exchange().await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(err = %e, "spotify token refresh failed");
                return Err(e);
            }
        };

        let token = grant.access_token.clone();
        {
            let mut state = self.state.lock();
            state.access_token = grant.access_token;
            state.expires_at = Some(Instant::now() + grant.lifetime);
        }
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        info!(expires_in_secs = grant.lifetime.as_secs(), "spotify access token refreshed");
        Ok(token)
    }

    /// Pre-load a token, e.g. one persisted by a collaborator.
    pub fn seed(&self, access_token: impl Into<String>, expires_at: Instant) {
        let mut state = self.state.lock();
        state.access_token = access_token.into();
        state.expires_at = Some(expires_at);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> TokenState {
        self.state.lock().clone()
    }

    /// Number of successful refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    fn cached(&self, now: Instant) -> Option<String> {
        let state = self.state.lock();
        if state.is_fresh_at(now) {
            debug!("reusing cached spotify access token");
            Some(state.access_token.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last-known playback state and the replies built from proxy results.
//!
//! When Spotify reports that no device is active, the front end is better
//! served by the most recent playback payload than by an error. These helpers
//! apply that substitution uniformly for any collaborator rendering replies.

use std::time::Instant;

use bytes::Bytes;
use parking_lot::RwLock;
use serde::Serialize;

use crate::error::ErrorCode;
use crate::upstream::classify::is_transient_no_device;
use crate::upstream::client::ProxyResult;

/// Content type of every [`Reply`] with a body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const ENCODE_FAILURE_BODY: &str = r#"{"error":"failed to encode reply","code":500}"#;

/// Most recent non-empty playback payload.
#[derive(Default)]
pub struct PlaybackCache {
    inner: RwLock<Option<CachedPlayback>>,
}

struct CachedPlayback {
    payload: Bytes,
    updated_at: Instant,
}

impl PlaybackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `payload`. Empty payloads are ignored.
    pub fn set(&self, payload: &[u8]) {
        if payload.is_empty() {
            return;
        }
        *self.inner.write() =
            Some(CachedPlayback { payload: Bytes::copy_from_slice(payload), updated_at: Instant::now() });
    }

    pub fn get(&self) -> Option<Bytes> {
        self.inner.read().as_ref().map(|c| c.payload.clone())
    }

    pub fn updated_at(&self) -> Option<Instant> {
        self.inner.read().as_ref().map(|c| c.updated_at)
    }
}

/// A rendered JSON reply: status plus body bytes (empty for 204).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Bytes,
}

impl Reply {
    /// Raw upstream bytes. 204 drops the body; status 0 becomes 200.
    pub fn raw(status: u16, body: Bytes) -> Self {
        match status {
            204 => Self { status, body: Bytes::new() },
            0 => Self { status: 200, body },
            _ => Self { status, body },
        }
    }

    /// Serialize `value`. An unencodable value yields a 500 envelope.
    pub fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self { status, body: Bytes::from(body) },
            Err(e) => {
                tracing::warn!(err = %e, "failed to encode reply");
                Self {
                    status: ErrorCode::Internal.http_status(),
                    body: Bytes::from_static(ENCODE_FAILURE_BODY.as_bytes()),
                }
            }
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::json(code.http_status(), &code.to_error_body(message))
    }

    /// Reply for collaborators running without a client.
    pub fn not_configured() -> Self {
        Self::error(ErrorCode::NotConfigured, "spotify integration is not configured")
    }

    /// `{"active": false}`: nothing is playing and nothing is cached.
    pub fn inactive() -> Self {
        Self::json(200, &serde_json::json!({ "active": false }))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        if self.body.is_empty() {
            None
        } else {
            Some(JSON_CONTENT_TYPE)
        }
    }
}

/// Forward a proxy result as-is.
///
/// Upstream errors with a body keep their status and body; any other failure
/// becomes a 502 error envelope.
pub fn passthrough(result: ProxyResult) -> Reply {
    match result.error {
        Some(ref e) if result.status >= 400 && !result.body.is_empty() => {
            tracing::debug!(status = result.status, err = %e, "forwarding upstream error");
            Reply::raw(result.status, result.body)
        }
        Some(e) => Reply::error(ErrorCode::BadGateway, e.to_string()),
        None => Reply::raw(result.status, result.body),
    }
}

/// Reply for a playback-state read (`GET /me/player`).
///
/// 204 and no-active-device failures serve the cached state; successful
/// payloads refresh the cache.
pub fn reply_for_state(result: ProxyResult, cache: &PlaybackCache) -> Reply {
    if result.status == 204 {
        return cached_or_inactive(cache);
    }
    if result.error.is_some() {
        return reply_with_fallback(result, cache);
    }
    cache.set(&result.body);
    Reply::raw(result.status, result.body)
}

/// Reply for a playback command: no-active-device failures serve the cached state.
pub fn reply_with_fallback(result: ProxyResult, cache: &PlaybackCache) -> Reply {
    if is_transient_no_device(&result.body, result.error.as_ref()) {
        return cached_or_inactive(cache);
    }
    passthrough(result)
}

fn cached_or_inactive(cache: &PlaybackCache) -> Reply {
    match cache.get() {
        Some(payload) => Reply::raw(200, payload),
        None => Reply::inactive(),
    }
}

#[cfg(test)]
#[path = "playback_tests.rs"]
mod tests;

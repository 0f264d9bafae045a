// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of failed upstream calls.

use serde::Deserialize;

use crate::error::ProxyError;

const NO_ACTIVE_DEVICE_REASON: &str = "NO_ACTIVE_DEVICE";
const NO_ACTIVE_DEVICE_TEXT: &str = "no active device";

/// Spotify error envelope: `{"error": {"status", "message", "reason"}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorDetail,
}

/// Either field may be absent or `null`.
#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Whether a failed call only failed because no playback device is active.
///
/// Callers use this to serve the last known playback state instead of an error.
/// Always `false` for successful calls.
pub fn is_transient_no_device(body: &[u8], error: Option<&ProxyError>) -> bool {
    let Some(error) = error else {
        return false;
    };

    if !body.is_empty() {
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
            let reason = envelope.error.reason.as_deref().unwrap_or("");
            let message = envelope.error.message.as_deref().unwrap_or("");
            if reason.eq_ignore_ascii_case(NO_ACTIVE_DEVICE_REASON)
                || message.to_lowercase().contains(NO_ACTIVE_DEVICE_TEXT)
            {
                return true;
            }
        }
    }

    error.to_string().to_lowercase().contains(NO_ACTIVE_DEVICE_TEXT)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials could not be resolved or the HTTP client could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// The refresh-token exchange failed.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with status >= 400; `body` is the trimmed response text.
    #[error("refresh token error: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid refresh response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("missing access_token in refresh response")]
    MissingAccessToken,
}

/// Error half of a [`ProxyResult`](crate::upstream::client::ProxyResult).
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// Upstream answered with status >= 400. The raw body is also kept on the result.
    #[error("spotify api error: {body}")]
    Upstream { status: u16, body: String },

    /// No status was obtained: connect failure, timeout, or a body read that broke off.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("marshal request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Error codes for replies rendered to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    NotConfigured,
    BadRequest,
    BadGateway,
    Internal,
}

impl ErrorCode {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotConfigured => 503,
            Self::BadRequest => 400,
            Self::BadGateway => 502,
            Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadGateway => "BAD_GATEWAY",
            Self::Internal => "INTERNAL",
        }
    }

    pub fn to_error_body(&self, message: impl Into<String>) -> ErrorBody {
        ErrorBody { error: message.into(), code: self.http_status() }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON error envelope: `{"error": <message>, "code": <http status>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

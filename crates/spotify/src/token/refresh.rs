// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Refresh-token exchange against the OAuth token endpoint.

use std::time::Duration;

use base64::Engine;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::credential::Credentials;
use crate::error::RefreshError;

/// Lifetime assumed when the token endpoint omits `expires_in` or sends a non-positive value.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn lifetime(&self) -> Duration {
        match self.expires_in {
            Some(secs) if secs > 0 => Duration::from_secs(secs.unsigned_abs()),
            _ => DEFAULT_TOKEN_LIFETIME,
        }
    }
}

/// A freshly issued access token and how long it stays valid.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub lifetime: Duration,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TryFrom<TokenResponse> for TokenGrant {
    type Error = RefreshError;

    fn try_from(resp: TokenResponse) -> Result<Self, Self::Error> {
        if resp.access_token.is_empty() {
            return Err(RefreshError::MissingAccessToken);
        }
        let lifetime = resp.lifetime();
        Ok(Self { access_token: resp.access_token, lifetime })
    }
}

/// Exchanges the stored refresh token for new access tokens.
pub struct TokenRefresher {
    http: reqwest::Client,
    token_url: String,
    credentials: Credentials,
}

impl TokenRefresher {
    pub fn new(http: reqwest::Client, token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self { http, token_url: token_url.into(), credentials }
    }

    /// `Authorization` header value: `Basic base64(client_id:client_secret)`.
    pub fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.credentials.client_id(), self.credentials.client_secret());
        format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
    }

    /// Perform one refresh-token exchange. Never retries.
    pub async fn exchange(&self) -> Result<TokenGrant, RefreshError> {
        let resp = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token()),
            ])
            .send()
            .await
            .map_err(RefreshError::Transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(RefreshError::Transport)?;
        if status.as_u16() >= 400 {
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }

        let parsed: TokenResponse = serde_json::from_slice(&body).map_err(RefreshError::Malformed)?;
        TokenGrant::try_from(parsed)
    }
}

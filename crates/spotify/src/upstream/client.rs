// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated proxy client for the Spotify Web API.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::credential::Credentials;
use crate::error::{ConfigError, ProxyError};
use crate::token::{TokenCache, TokenRefresher};

/// One upstream request: verb, API path, ordered query pairs, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ProxyCall {
    /// Build a call; `path` gains a leading `/` if it lacks one.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self { method, path, query: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query pair. Repeated keys are kept in order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Outcome of a proxy call.
///
/// `status` is 0 when no response was obtained. `body` holds the raw upstream
/// bytes, also on failure, and is empty for 204.
#[derive(Debug)]
pub struct ProxyResult {
    pub status: u16,
    pub body: Bytes,
    pub error: Option<ProxyError>,
}

impl ProxyResult {
    pub fn ok(status: u16, body: Bytes) -> Self {
        Self { status, body, error: None }
    }

    /// A failure before any upstream status was known.
    pub fn failed(error: ProxyError) -> Self {
        Self { status: 0, body: Bytes::new(), error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into `(status, body)` or the error.
    pub fn into_result(self) -> Result<(u16, Bytes), ProxyError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok((self.status, self.body)),
        }
    }
}

/// Spotify Web API client holding the per-process token cache.
pub struct SpotifyClient {
    http: reqwest::Client,
    config: GatewayConfig,
    tokens: TokenCache,
}

impl SpotifyClient {
    pub fn new(credentials: Credentials, config: &GatewayConfig) -> Result<Self, ConfigError> {
        let http = crate::upstream::http_client(config.timeout())?;
        let refresher = TokenRefresher::new(http.clone(), config.token_url.clone(), credentials);
        Ok(Self { http, config: config.clone(), tokens: TokenCache::new(refresher) })
    }

    /// Resolve credentials from the configured sources and build the client.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        Self::new(Credentials::from_config(config)?, config)
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Perform `call` against the API with a valid bearer token.
    ///
    /// Dropping the returned future aborts the outbound request.
    pub async fn call(&self, call: &ProxyCall) -> ProxyResult {
        let token = match self.tokens.valid_token().await {
            Ok(token) => token,
            Err(e) => return ProxyResult::failed(e.into()),
        };

        let url = self.config.api_url(&call.path);
        let mut req = self.http.request(call.method.clone(), &url).bearer_auth(token);
        if !call.query.is_empty() {
            req = req.query(&call.query);
        }
        if let Some(ref body) = call.body {
            let payload = match serde_json::to_vec(body) {
                Ok(payload) => payload,
                Err(e) => return ProxyResult::failed(ProxyError::Encode(e)),
            };
            req = req.header(CONTENT_TYPE, "application/json").body(payload);
        }

        debug!(method = %call.method, path = %call.path, "spotify api call");
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(method = %call.method, path = %call.path, err = %e, "spotify api unreachable");
                return ProxyResult::failed(ProxyError::Transport(e));
            }
        };

        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return ProxyResult::ok(status.as_u16(), Bytes::new());
        }

        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return ProxyResult {
                    status: status.as_u16(),
                    body: Bytes::new(),
                    error: Some(ProxyError::Transport(e)),
                }
            }
        };
        if status.as_u16() >= 400 {
            debug!(method = %call.method, path = %call.path, status = status.as_u16(), "spotify api error");
            let text = String::from_utf8_lossy(&body).trim().to_owned();
            return ProxyResult {
                status: status.as_u16(),
                body,
                error: Some(ProxyError::Upstream { status: status.as_u16(), body: text }),
            };
        }
        ProxyResult::ok(status.as_u16(), body)
    }

    /// Like [`call`](Self::call), but gives up as soon as `cancel` fires.
    pub async fn call_until(&self, call: &ProxyCall, cancel: &CancellationToken) -> ProxyResult {
        tokio::select! {
            _ = cancel.cancelled() => ProxyResult::failed(ProxyError::Cancelled),
            result = self.call(call) => result,
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: mock upstream servers and assertion helpers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::credential::Credentials;

pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_CLIENT_SECRET: &str = "test-secret";
pub const TEST_REFRESH_TOKEN: &str = "test-refresh";

/// A request observed by a mock endpoint.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub body: String,
}

impl Captured {
    pub fn from_parts(headers: &HeaderMap, query: Option<String>, body: String) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
        Self {
            authorization: header("authorization"),
            content_type: header("content-type"),
            query,
            body,
        }
    }
}

/// Call counter plus the requests seen by a mock endpoint.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<AtomicU32>,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    /// Record one request and return its zero-based index.
    pub fn record(&self, captured: Captured) -> usize {
        self.seen.lock().push(captured);
        self.calls.fetch_add(1, Ordering::SeqCst) as usize
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Captured> {
        self.seen.lock().last().cloned()
    }
}

/// `POST /api/token` answering with scripted `(status, body)` pairs; the last one repeats.
pub fn token_endpoint(responses: Vec<(u16, String)>) -> (Router, Recorder) {
    let recorder = Recorder::default();
    let responses = Arc::new(responses);
    let rec = recorder.clone();

    let app = Router::new().route(
        "/api/token",
        post(move |headers: HeaderMap, body: String| {
            let rec = rec.clone();
            let resps = Arc::clone(&responses);
            async move {
                let idx = rec.record(Captured::from_parts(&headers, None, body));
                let (status, body) = resps
                    .get(idx)
                    .or_else(|| resps.last())
                    .cloned()
                    .unwrap_or((500, "{}".to_owned()));
                (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
            }
        }),
    );
    (app, recorder)
}

/// A successful token response body.
pub fn token_body(access_token: &str, expires_in: Option<i64>) -> String {
    let mut body = serde_json::json!({ "access_token": access_token, "token_type": "Bearer" });
    if let Some(secs) = expires_in {
        body["expires_in"] = serde_json::json!(secs);
    }
    body.to_string()
}

/// Serve `app` on an ephemeral localhost port.
pub async fn serve(app: Router) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(addr)
}

/// Config pointing both the token endpoint and the API base at `addr`.
pub fn test_config(addr: SocketAddr) -> GatewayConfig {
    GatewayConfig {
        api_base: format!("http://{addr}/v1"),
        token_url: format!("http://{addr}/api/token"),
        timeout_ms: 2000,
        integration_id: "spotify".to_owned(),
        secrets_path: None,
        log_format: "text".to_owned(),
        log_level: "debug".to_owned(),
    }
}

pub fn test_credentials() -> anyhow::Result<Credentials> {
    Ok(Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REFRESH_TOKEN)?)
}

/// Assert that an expression evaluates to `Err` whose Display output
/// contains the given substring.
#[macro_export]
macro_rules! assert_err_contains {
    ($expr:expr, $substr:expr) => {{
        let result = $expr;
        let err = result.expect_err(concat!("expected Err for: ", stringify!($expr)));
        let msg = err.to_string();
        assert!(msg.contains($substr), "expected error containing {:?}, got: {msg:?}", $substr);
    }};
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::{Duration, Instant};

use base64::Engine;

use super::*;
use crate::test_support::{
    serve, test_config, test_credentials, token_body, token_endpoint, Recorder,
};

async fn cache_for(responses: Vec<(u16, String)>) -> anyhow::Result<(TokenCache, Recorder)> {
    let (app, recorder) = token_endpoint(responses);
    let addr = serve(app).await?;
    let config = test_config(addr);
    let http = crate::upstream::http_client(config.timeout())?;
    let refresher = TokenRefresher::new(http, config.token_url, test_credentials()?);
    Ok((TokenCache::new(refresher), recorder))
}

#[yare::parameterized(
    well_before_skew = { 3600, true },
    one_past_skew    = { 31, true },
    exactly_skew     = { 30, false },
    inside_skew      = { 29, false },
    at_expiry        = { 0, false },
)]
fn fresh_only_before_expiry_minus_skew(secs_until_expiry: u64, fresh: bool) {
    let now = Instant::now();
    let state = TokenState {
        access_token: "tok".to_owned(),
        expires_at: Some(now + Duration::from_secs(secs_until_expiry)),
    };
    assert_eq!(state.is_fresh_at(now), fresh);
}

#[test]
fn never_fetched_is_not_fresh() {
    let now = Instant::now();
    assert!(!TokenState::default().is_fresh_at(now));

    let blank = TokenState {
        access_token: String::new(),
        expires_at: Some(now + Duration::from_secs(3600)),
    };
    assert!(!blank.is_fresh_at(now));
}

#[yare::parameterized(
    omitted  = { None, 3600 },
    zero     = { Some(0), 3600 },
    negative = { Some(-10), 3600 },
    declared = { Some(120), 120 },
)]
fn lifetime_defaults_when_not_positive(expires_in: Option<i64>, expected_secs: u64) {
    let resp = TokenResponse { access_token: "tok".to_owned(), expires_in, token_type: None };
    assert_eq!(resp.lifetime(), Duration::from_secs(expected_secs));
}

#[tokio::test]
async fn refresh_sends_basic_auth_and_form() -> anyhow::Result<()> {
    let (cache, recorder) = cache_for(vec![(200, token_body("tok-1", Some(3600)))]).await?;

    assert_eq!(cache.valid_token().await?, "tok-1");
    assert_eq!(recorder.calls(), 1);

    let seen = recorder.last().ok_or_else(|| anyhow::anyhow!("no request captured"))?;
    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("test-client:test-secret")
    );
    assert_eq!(seen.authorization.as_deref(), Some(expected.as_str()));
    assert_eq!(seen.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert!(seen.body.contains("grant_type=refresh_token"), "body: {}", seen.body);
    assert!(seen.body.contains("refresh_token=test-refresh"), "body: {}", seen.body);
    Ok(())
}

#[tokio::test]
async fn fresh_token_is_reused_without_network() -> anyhow::Result<()> {
    let (cache, recorder) = cache_for(vec![(200, token_body("unexpected", Some(3600)))]).await?;

    // Issued ten minutes ago with a one hour lifetime.
    cache.seed("cached-token", Instant::now() + Duration::from_secs(50 * 60));

    let first = cache.valid_token().await?;
    let second = cache.valid_token().await?;
    assert_eq!(first, "cached-token");
    assert_eq!(first, second);
    assert_eq!(recorder.calls(), 0);
    assert_eq!(cache.refresh_count(), 0);
    Ok(())
}

#[tokio::test]
async fn refreshed_token_is_reused_until_near_expiry() -> anyhow::Result<()> {
    let (cache, recorder) = cache_for(vec![(200, token_body("tok-1", Some(3600)))]).await?;

    assert_eq!(cache.valid_token().await?, "tok-1");
    assert_eq!(cache.valid_token().await?, "tok-1");
    assert_eq!(recorder.calls(), 1);
    assert_eq!(cache.refresh_count(), 1);
    Ok(())
}

#[tokio::test]
async fn token_inside_skew_window_is_refreshed() -> anyhow::Result<()> {
    let (cache, recorder) = cache_for(vec![(200, token_body("tok-new", Some(3600)))]).await?;

    cache.seed("tok-old", Instant::now() + Duration::from_secs(20));
    assert_eq!(cache.valid_token().await?, "tok-new");
    assert_eq!(recorder.calls(), 1);
    assert_eq!(cache.snapshot().access_token, "tok-new");
    Ok(())
}

#[tokio::test]
async fn omitted_expires_in_yields_one_hour() -> anyhow::Result<()> {
    let (cache, _recorder) = cache_for(vec![(200, token_body("tok-1", None))]).await?;

    let before = Instant::now();
    cache.refresh().await?;
    let after = Instant::now();

    let expires_at =
        cache.snapshot().expires_at.ok_or_else(|| anyhow::anyhow!("expiry not recorded"))?;
    assert!(expires_at >= before + DEFAULT_TOKEN_LIFETIME);
    assert!(expires_at <= after + DEFAULT_TOKEN_LIFETIME);
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_leaves_state_untouched() -> anyhow::Result<()> {
    let (cache, recorder) =
        cache_for(vec![(400, r#"{"error":"invalid_grant"}"#.to_owned())]).await?;

    let stale_at = Instant::now();
    cache.seed("old-token", stale_at);
    let before = cache.snapshot();

    let err = cache.valid_token().await.err();
    match err {
        Some(RefreshError::Rejected { status, ref body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, r#"{"error":"invalid_grant"}"#);
        }
        other => anyhow::bail!("expected Rejected, got {other:?}"),
    }
    assert_eq!(recorder.calls(), 1);
    assert_eq!(cache.snapshot(), before);
    assert_eq!(cache.refresh_count(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_access_token_is_an_error() -> anyhow::Result<()> {
    let (cache, _recorder) = cache_for(vec![(200, r#"{"expires_in":3600}"#.to_owned())]).await?;

    assert!(matches!(cache.refresh().await, Err(RefreshError::MissingAccessToken)));
    assert!(cache.snapshot().access_token.is_empty());
    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_malformed() -> anyhow::Result<()> {
    let (cache, _recorder) = cache_for(vec![(200, "<html>oops</html>".to_owned())]).await?;

    assert!(matches!(cache.refresh().await, Err(RefreshError::Malformed(_))));
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() -> anyhow::Result<()> {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?
    };
    let config = test_config(addr);
    let http = crate::upstream::http_client(config.timeout())?;
    let cache = TokenCache::new(TokenRefresher::new(http, config.token_url, test_credentials()?));

    crate::assert_err_contains!(cache.valid_token().await, "refresh request failed");
    Ok(())
}

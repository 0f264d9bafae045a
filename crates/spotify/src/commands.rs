// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed builders for the playback calls issued by the front end.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ErrorCode;
use crate::upstream::client::ProxyCall;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: &str = "12";

/// A command request that cannot be turned into an upstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCommand {
    #[error("missing uri")]
    MissingUri,
    #[error("missing device_id")]
    MissingDeviceId,
    #[error("missing query")]
    MissingQuery,
}

impl InvalidCommand {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::BadRequest
    }
}

/// Body of a play request. Every field is optional; absent fields resume playback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayRequest {
    #[serde(default)]
    pub context_uri: Option<String>,
    #[serde(default)]
    pub uris: Vec<String>,
    #[serde(default)]
    pub offset: Option<Value>,
    #[serde(default)]
    pub position_ms: Option<i64>,
    #[serde(default)]
    pub device_id: Option<String>,
}

pub fn state() -> ProxyCall {
    ProxyCall::get("/me/player")
}

pub fn queue() -> ProxyCall {
    ProxyCall::get("/me/player/queue")
}

pub fn devices() -> ProxyCall {
    ProxyCall::get("/me/player/devices")
}

/// `PUT /me/player/play`. Only the fields that were supplied are forwarded.
pub fn play(req: &PlayRequest) -> ProxyCall {
    let mut body = Map::new();
    if let Some(uri) = non_blank(req.context_uri.as_deref()) {
        body.insert("context_uri".to_owned(), Value::from(uri));
    }
    if !req.uris.is_empty() {
        body.insert("uris".to_owned(), Value::from(req.uris.clone()));
    }
    if let Some(ref offset) = req.offset {
        body.insert("offset".to_owned(), offset.clone());
    }
    if let Some(position) = req.position_ms {
        body.insert("position_ms".to_owned(), Value::from(position));
    }

    let call = ProxyCall::put("/me/player/play").json(Value::Object(body));
    with_device(call, req.device_id.as_deref())
}

pub fn pause() -> ProxyCall {
    ProxyCall::put("/me/player/pause")
}

pub fn next() -> ProxyCall {
    ProxyCall::post("/me/player/next")
}

pub fn previous() -> ProxyCall {
    ProxyCall::post("/me/player/previous")
}

pub fn shuffle(state: bool) -> ProxyCall {
    ProxyCall::put("/me/player/shuffle").query("state", state.to_string())
}

/// `PUT /me/player/repeat`. A blank state means `off`.
pub fn repeat(state: &str) -> ProxyCall {
    let state = non_blank(Some(state)).unwrap_or("off");
    ProxyCall::put("/me/player/repeat").query("state", state)
}

pub fn volume(percent: i64) -> ProxyCall {
    ProxyCall::put("/me/player/volume").query("volume_percent", percent.to_string())
}

pub fn seek(position_ms: i64) -> ProxyCall {
    ProxyCall::put("/me/player/seek").query("position_ms", position_ms.to_string())
}

pub fn add_to_queue(uri: &str, device_id: Option<&str>) -> Result<ProxyCall, InvalidCommand> {
    let uri = non_blank(Some(uri)).ok_or(InvalidCommand::MissingUri)?;
    let call = ProxyCall::post("/me/player/queue").query("uri", uri);
    Ok(with_device(call, device_id))
}

pub fn transfer(device_id: &str, play: bool) -> Result<ProxyCall, InvalidCommand> {
    let device_id = non_blank(Some(device_id)).ok_or(InvalidCommand::MissingDeviceId)?;
    Ok(ProxyCall::put("/me/player")
        .json(serde_json::json!({ "device_ids": [device_id], "play": play })))
}

/// Track search. A blank limit falls back to [`DEFAULT_SEARCH_LIMIT`].
pub fn search(query: &str, limit: Option<&str>) -> Result<ProxyCall, InvalidCommand> {
    let query = non_blank(Some(query)).ok_or(InvalidCommand::MissingQuery)?;
    let limit = non_blank(limit).unwrap_or(DEFAULT_SEARCH_LIMIT);
    Ok(ProxyCall::get("/search").query("q", query).query("type", "track").query("limit", limit))
}

fn with_device(call: ProxyCall, device_id: Option<&str>) -> ProxyCall {
    match non_blank(device_id) {
        Some(id) => call.query("device_id", id),
        None => call,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

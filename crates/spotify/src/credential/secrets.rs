// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fallback credential lookup from the integration secrets JSON file.
//!
//! Two layouts are accepted: an object keyed by integration id whose values
//! are string maps, or a single flat string map. Anything else (missing
//! file, unreadable file, other JSON shapes) yields an empty source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::credential::source::{CredentialSource, MapSource};

type ByIntegration = HashMap<String, HashMap<String, String>>;
type Flat = HashMap<String, String>;

/// Secrets loaded once from disk for a single integration.
#[derive(Debug, Default, Clone)]
pub struct SecretsFile {
    values: MapSource,
}

impl SecretsFile {
    /// Load the entries for `integration_id` from `path`.
    pub fn load(path: &Path, integration_id: &str) -> Self {
        let integration_id = integration_id.trim();
        if path.as_os_str().is_empty() || integration_id.is_empty() {
            return Self::default();
        }
        let contents = match std::fs::read(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), err = %e, "secrets file not readable");
                return Self::default();
            }
        };
        Self::parse(&contents, integration_id).unwrap_or_else(|| {
            warn!(path = %path.display(), "secrets file is not a recognised JSON layout");
            Self::default()
        })
    }

    /// Parse file contents. Returns `None` when neither layout matches.
    pub fn parse(contents: &[u8], integration_id: &str) -> Option<Self> {
        if let Ok(mut by_integration) = serde_json::from_slice::<ByIntegration>(contents) {
            let values = by_integration.remove(integration_id).unwrap_or_default();
            return Some(Self { values: MapSource::new(values) });
        }
        if let Ok(flat) = serde_json::from_slice::<Flat>(contents) {
            return Some(Self { values: MapSource::new(flat) });
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CredentialSource for SecretsFile {
    fn name(&self) -> &'static str {
        "secrets-file"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.lookup(key)
    }
}

/// A [`SecretsFile`] read from disk on the first lookup that reaches it.
#[derive(Debug)]
pub struct DeferredSecrets {
    path: PathBuf,
    integration_id: String,
    loaded: OnceLock<SecretsFile>,
}

impl DeferredSecrets {
    pub fn new(path: impl Into<PathBuf>, integration_id: impl Into<String>) -> Self {
        Self { path: path.into(), integration_id: integration_id.into(), loaded: OnceLock::new() }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn secrets(&self) -> &SecretsFile {
        self.loaded.get_or_init(|| SecretsFile::load(&self.path, &self.integration_id))
    }
}

impl CredentialSource for DeferredSecrets {
    fn name(&self) -> &'static str {
        "secrets-file"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.secrets().lookup(key)
    }
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;

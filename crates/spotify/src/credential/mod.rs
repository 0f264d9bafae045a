// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential resolution: client id, client secret, and refresh token.
//!
//! Values come from an ordered chain of [`CredentialSource`]s. Each key is
//! looked up independently, so the environment can supply some values and
//! the secrets file the rest. Resolution happens once at startup; the
//! resulting [`Credentials`] are immutable.

pub mod secrets;
pub mod source;

use std::fmt;

use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::ConfigError;

pub use secrets::{DeferredSecrets, SecretsFile};
pub use source::{CredentialSource, EnvSource, MapSource};

pub const CLIENT_ID_KEY: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN_KEY: &str = "SPOTIFY_REFRESH_TOKEN";

/// OAuth client credentials plus the long-lived refresh token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl Credentials {
    /// Build credentials from explicit values. Blank values are rejected.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let client_id = client_id.into().trim().to_owned();
        let client_secret = client_secret.into().trim().to_owned();
        let refresh_token = refresh_token.into().trim().to_owned();

        let missing: Vec<&'static str> = [
            (CLIENT_ID_KEY, &client_id),
            (CLIENT_SECRET_KEY, &client_secret),
            (REFRESH_TOKEN_KEY, &refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials { missing });
        }

        Ok(Self { client_id, client_secret, refresh_token })
    }

    /// Resolve credentials from the default chain: environment, then secrets file.
    ///
    /// The file is only read if the environment leaves a value blank.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let sources: Vec<Box<dyn CredentialSource>> = vec![
            Box::new(EnvSource),
            Box::new(DeferredSecrets::new(config.secrets_path(), config.integration_id.clone())),
        ];
        resolve(&sources)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Resolve each credential key from the first source that answers with a non-blank value.
pub fn resolve(sources: &[Box<dyn CredentialSource>]) -> Result<Credentials, ConfigError> {
    let lookup = |key: &str| -> String {
        for source in sources {
            if let Some(value) = source.lookup(key) {
                debug!(key, source = source.name(), "credential resolved");
                return value;
            }
        }
        String::new()
    };

    Credentials::new(lookup(CLIENT_ID_KEY), lookup(CLIENT_SECRET_KEY), lookup(REFRESH_TOKEN_KEY))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Deployment configuration shared by issuing and verifying devices.
//!
//! The shared secret is never compiled in: it comes either from the JSON
//! configuration file or from the `GATEPASS_SECRET` environment variable,
//! the latter taking precedence.

use crate::token::{self, default_max_envelope_age, default_validity_window};
use crate::token::{Issuer, SharedSecret, Verifier};
use chrono::Duration;
use serde::Deserialize;

pub const SECRET_ENV_VAR: &str = "GATEPASS_SECRET";

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Semantic error: {0}")]
    Sema(String),
    #[error("Missing secret: {0}")]
    MissingSecret(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e) | Error::Sema(e) | Error::MissingSecret(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    secret: Option<String>,
    validity_window_secs: Option<i64>,
    max_envelope_age_secs: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub secret: SharedSecret,
    /// Lifetime of an issued credential
    pub validity_window: Duration,
    /// Maximum age of an envelope accepted by a verifier
    pub max_envelope_age: Duration,
}

impl Config {
    /// Parse a JSON configuration, letting `GATEPASS_SECRET` override the
    /// secret it contains
    pub fn load_json(j: &str) -> Result<Self, Error> {
        let f: ConfigFile = serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        Self::build(f, std::env::var(SECRET_ENV_VAR).ok())
    }

    /// Default windows, secret taken from `GATEPASS_SECRET`
    pub fn from_env() -> Result<Self, Error> {
        Self::build(ConfigFile::default(), std::env::var(SECRET_ENV_VAR).ok())
    }

    fn build(f: ConfigFile, env_secret: Option<String>) -> Result<Self, Error> {
        let secret = env_secret
            .filter(|s| !s.is_empty())
            .or(f.secret)
            .ok_or_else(|| {
                Error::MissingSecret(format!(
                    "no shared secret in configuration or in {SECRET_ENV_VAR}"
                ))
            })?;

        let secret = SharedSecret::new(secret).map_err(|e| match e {
            token::Error::MissingSecret(m) => Error::MissingSecret(m),
            other => Error::Sema(other.to_string()),
        })?;

        let validity_window = f
            .validity_window_secs
            .map(|v| positive_secs("validity_window_secs", v))
            .transpose()?
            .unwrap_or_else(default_validity_window);

        let max_envelope_age = f
            .max_envelope_age_secs
            .map(|v| positive_secs("max_envelope_age_secs", v))
            .transpose()?
            .unwrap_or_else(default_max_envelope_age);

        Ok(Self {
            secret,
            validity_window,
            max_envelope_age,
        })
    }

    pub fn issuer(&self) -> Issuer {
        Issuer::new(self.secret.clone())
    }

    pub fn verifier(&self) -> Verifier {
        Verifier::new(self.secret.clone(), self.max_envelope_age)
    }
}

fn positive_secs(name: &str, v: i64) -> Result<Duration, Error> {
    if v <= 0 {
        return Err(Error::Sema(format!("{name} must be positive, got {v}")));
    }

    Duration::try_seconds(v).ok_or_else(|| Error::Sema(format!("{name} is out of range")))
}

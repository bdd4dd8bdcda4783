// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The privilege tier printed on a credential.  The tier is informational:
/// area authorization is always driven by the allowed-areas list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    General,
    #[serde(rename = "VIP")]
    Vip,
    Staff,
    Security,
    Management,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::General => "General",
            AccessLevel::Vip => "VIP",
            AccessLevel::Staff => "Staff",
            AccessLevel::Security => "Security",
            AccessLevel::Management => "Management",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "General" => Ok(AccessLevel::General),
            "VIP" => Ok(AccessLevel::Vip),
            "Staff" => Ok(AccessLevel::Staff),
            "Security" => Ok(AccessLevel::Security),
            "Management" => Ok(AccessLevel::Management),
            unknown => Err(format!("unknown access level {unknown}")),
        }
    }
}

/// A person entitled to a credential, together with the areas they may
/// currently enter.  Records are keyed by their (normalized) email address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,

    pub email: String,

    pub name: String,

    /// Contact number, carried for provisioning only and never put on a
    /// credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub access_level: AccessLevel,

    /// Ordered list of area names, e.g. "Main Arena"
    pub allowed_areas: Vec<String>,

    #[serde(rename = "is_active", default = "default_active")]
    pub active: bool,
}

pub(crate) fn default_active() -> bool {
    true
}

impl Identity {
    pub fn may_enter(&self, area: &str) -> bool {
        self.allowed_areas.iter().any(|a| a == area)
    }
}

/// Email addresses are the natural key of identities and operators; they are
/// compared after trimming and lower-casing.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

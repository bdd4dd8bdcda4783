// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::identity::default_active;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    Volunteer,
    Security,
    Admin,
}

/// A person allowed to run a scanning station.  The operator's name is
/// recorded as the verifier identity on every scan made at their station.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: OperatorRole,
    #[serde(rename = "is_active", default = "default_active")]
    pub active: bool,
}

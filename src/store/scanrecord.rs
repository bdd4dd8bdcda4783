// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one scan attempt, as written to the audit log.
///
/// `identity_id` and `identity_name` are absent when the credential was
/// rejected before any identity could be established (e.g., a tampered or
/// unparseable code).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(rename = "user_id")]
    pub identity_id: Option<i64>,

    #[serde(rename = "user_name")]
    pub identity_name: Option<String>,

    pub area: String,

    #[serde(rename = "access_granted")]
    pub granted: bool,

    pub failure_reason: Option<String>,

    pub scanned_at: DateTime<Utc>,

    #[serde(rename = "scanner_user")]
    pub verifier_identity: String,
}

/// A ScanRecord together with the sequence number the log assigned to it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub seq: u64,

    #[serde(flatten)]
    pub record: ScanRecord,
}

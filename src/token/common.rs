// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Value of the `version` field of every signed payload
pub const FORMAT_VERSION: &str = "2.0";

/// How long a freshly issued credential stays valid
pub fn default_validity_window() -> Duration {
    Duration::hours(1)
}

/// Upper bound on the age of an envelope, independent of the payload's own
/// expiry
pub fn default_max_envelope_age() -> Duration {
    Duration::hours(24)
}

/// Wire timestamps are milliseconds since the Unix epoch
pub fn to_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

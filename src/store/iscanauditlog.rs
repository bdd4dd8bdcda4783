// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::scanrecord::{AuditEntry, ScanRecord};

/// Append-only log of scan decisions.  Implementations must accept appends
/// from several stations at once.
pub trait IScanAuditLog {
    /// Append a record, returning the sequence number assigned to it
    fn append(&self, record: ScanRecord) -> Result<u64, Error>;

    /// Return up to `limit` entries, most recent first
    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error>;
}

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::identity::Identity;

/// Interface to the locally replicated access policy.  Implementations must
/// allow concurrent readers and must never expose a partially updated
/// identity to them.
pub trait IPolicyStore {
    /// Lookup the current identity record for the given email address
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>, Error>;

    /// Return every identity, ordered by id
    fn list_all(&self) -> Result<Vec<Identity>, Error>;

    /// Insert or replace an identity (provisioning only).  When the email is
    /// already known the stored record keeps its id and every other field is
    /// overwritten.
    fn upsert(&self, identity: Identity) -> Result<(), Error>;
}

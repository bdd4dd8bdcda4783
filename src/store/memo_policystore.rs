// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::identity::{normalize_email, Identity};
use super::IPolicyStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory access policy.  Identities are indexed by normalized email.
#[derive(Debug, Default)]
pub struct MemoPolicyStore {
    p: RwLock<HashMap<String, Identity>>,
}

impl MemoPolicyStore {
    /// Returns a new empty MemoPolicyStore
    pub fn new() -> Self {
        Self {
            p: Default::default(),
        }
    }

    /// Add to an existing (and possibly empty) MemoPolicyStore the identities
    /// loaded from the given JSON array
    pub fn load_json(&self, j: &str) -> Result<(), Error> {
        let ids: Vec<Identity> =
            serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        for id in ids {
            self.upsert(id)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.p.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IPolicyStore for MemoPolicyStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>, Error> {
        let p = self
            .p
            .read()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        Ok(p.get(&normalize_email(email)).cloned())
    }

    fn list_all(&self) -> Result<Vec<Identity>, Error> {
        let p = self
            .p
            .read()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        let mut v: Vec<Identity> = p.values().cloned().collect();
        v.sort_by_key(|i| i.id);

        Ok(v)
    }

    fn upsert(&self, mut identity: Identity) -> Result<(), Error> {
        let key = normalize_email(&identity.email);

        if key.is_empty() {
            return Err(Error::Sema(format!(
                "identity {} has no email address",
                identity.id
            )));
        }

        identity.email = key.clone();

        let mut p = self
            .p
            .write()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        if let Some(existing) = p.get(&key) {
            identity.id = existing.id;
        }

        p.insert(key, identity);

        Ok(())
    }
}

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::identity::normalize_email;
use super::operator::Operator;
use super::IOperatorStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// The store where station operators are stashed, indexed by normalized email.
#[derive(Debug, Default)]
pub struct MemoOperatorStore {
    p: RwLock<HashMap<String, Operator>>,
}

impl MemoOperatorStore {
    pub fn new() -> Self {
        Self {
            p: Default::default(),
        }
    }

    /// Add to an existing (and possibly empty) MemoOperatorStore the
    /// operators loaded from the given JSON array
    pub fn load_json(&self, j: &str) -> Result<(), Error> {
        let ops: Vec<Operator> =
            serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        let mut p = self
            .p
            .write()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        for mut op in ops {
            op.email = normalize_email(&op.email);
            p.insert(op.email.clone(), op);
        }

        Ok(())
    }
}

impl IOperatorStore for MemoOperatorStore {
    fn find_operator(&self, email: &str) -> Result<Option<Operator>, Error> {
        let p = self
            .p
            .read()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        Ok(p.get(&normalize_email(email)).cloned())
    }
}

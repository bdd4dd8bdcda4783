// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::operator::Operator;

/// Interface to the directory of scanning station operators.
pub trait IOperatorStore {
    /// Lookup an operator given their email address
    fn find_operator(&self, email: &str) -> Result<Option<Operator>, Error>;
}

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    #[error("Unknown area: {0}")]
    UnknownArea(String),
    #[error("Station busy: {0}")]
    Busy(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownOperator(e) | Error::UnknownArea(e) | Error::Busy(e) | Error::Store(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

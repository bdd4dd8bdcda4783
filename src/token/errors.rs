// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Semantic error: {0}")]
    Sema(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Inactive identity: {0}")]
    InactiveIdentity(String),
    #[error("Missing secret: {0}")]
    MissingSecret(String),
    #[error("MAC computation failed: {0}")]
    Mac(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e)
            | Error::Sema(e)
            | Error::MalformedInput(e)
            | Error::InactiveIdentity(e)
            | Error::MissingSecret(e)
            | Error::Mac(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The token module implements the credential protocol: building and
//! signing a payload on the issuing device ([`Issuer`]), and checking the
//! scanned text on the verifying device ([`Verifier`]).
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use gatepass::store::{IPolicyStore, MemoPolicyStore};
//! use gatepass::token::{Issuer, SharedSecret, Verifier};
//!
//! const jpolicy: &str = include_str!("../../testdata/policy.json");
//! let policy = MemoPolicyStore::new();
//! policy.load_json(jpolicy).expect("loading access policy");
//!
//! let john = policy
//!     .find_by_email("john.athlete@sports.com")
//!     .expect("looking up identity")
//!     .expect("identity is provisioned");
//!
//! // the same secret is provisioned on both the issuing and the verifying
//! // devices
//! let secret = SharedSecret::new("example-only-secret").expect("secret");
//!
//! let now = Utc::now();
//! let qr = Issuer::new(secret.clone())
//!     .issue_qr_text(&john, "device-fingerprint", now, Duration::hours(1))
//!     .expect("issuing credential");
//!
//! let claim = Verifier::with_default_age(secret)
//!     .verify(&qr, now + Duration::minutes(30))
//!     .expect("credential verifies");
//!
//! assert_eq!(claim.email, "john.athlete@sports.com");
//! ```

pub use self::common::*;
pub use self::envelope::{decode_envelope, encode_envelope, Decoded, LegacyPayload, SignedEnvelope};
pub use self::errors::Error;
pub use self::issuer::Issuer;
pub use self::mac::SharedSecret;
pub use self::payload::{decode_payload, encode_payload, CredentialPayload};
pub use self::verifier::{Assurance, Rejection, Verification, VerifiedClaim, Verifier};

pub mod fingerprint;

mod common;
mod envelope;
mod errors;
mod issuer;
mod mac;
mod payload;
mod verifier;

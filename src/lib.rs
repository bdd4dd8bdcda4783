// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Event access credentials: issuance, offline verification and access
//! decisions.
//!
//! An issuing device signs a short-lived credential for an identity and
//! renders it as a QR code.  A verifying station scans the code, checks its
//! integrity and freshness using a secret shared with the issuer, and then
//! decides on access against its local copy of the access policy.
//!
//! The API allows:
//! * Issuing HMAC-signed credentials bound to the issuing device's fingerprint
//! * Verifying scanned credentials, including the legacy unsigned format
//! * Deciding access against the live policy and auditing every scan

pub mod access;
pub mod config;
pub mod store;
pub mod token;

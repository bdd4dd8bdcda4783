// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Access decisions at a verifying station.
//!
//! A [`ScanStation`] ties a [`crate::token::Verifier`] to the local access
//! policy and audit log: every scanned code is verified, checked against the
//! *current* policy by the [`DecisionEngine`], and recorded, whatever the
//! outcome.

pub use self::decision::{Decision, DecisionEngine, DenyReason, Verdict};
pub use self::errors::Error;
pub use self::station::{authenticate, ScanStation};

mod decision;
mod errors;
mod station;

/// The areas a station can be set up to guard
pub const KNOWN_AREAS: [&str; 6] = [
    "Main Arena",
    "VIP Lounge",
    "Staff Area",
    "Security Zone",
    "General Entrance",
    "Food Court",
];

pub fn is_known_area(area: &str) -> bool {
    KNOWN_AREAS.contains(&area)
}

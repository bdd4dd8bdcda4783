// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::{default_max_envelope_age, from_millis, to_millis};
use super::envelope::{decode_envelope, Decoded, LegacyPayload, SignedEnvelope};
use super::mac::{self, SharedSecret};
use super::payload::decode_payload;
use crate::store::AccessLevel;
use chrono::{DateTime, Duration, Utc};

/// How much the verifier can vouch for a claim
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assurance {
    /// The claim was protected by a valid MAC
    Signed,
    /// The claim came from a legacy, unsigned credential
    Unsigned,
}

/// The identity a credential speaks for, as established by verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedClaim {
    pub identity_id: i64,
    pub email: String,
    pub name: String,
    pub access_level: AccessLevel,
    /// Allowed areas as recorded at issuance (empty for legacy credentials)
    pub allowed_areas: Vec<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub assurance: Assurance,
}

/// Why a credential was rejected.  The text form is what ends up in the
/// audit log.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    #[error("invalid credential format: {0}")]
    InvalidFormat(String),
    #[error("credential envelope is too old")]
    EnvelopeExpired,
    #[error("credential tampered or signature invalid")]
    TamperedOrInvalidSignature,
    #[error("credential expired")]
    Expired,
    #[error("invalid device binding")]
    InvalidDeviceBinding,
    #[error("verifier malfunction: {0}")]
    VerifierMalfunction(String),
}

pub type Verification = Result<VerifiedClaim, Rejection>;

/// Validates scanned credentials.  A verifier holds no state besides its
/// configuration and never consults the policy store.
#[derive(Debug, Clone)]
pub struct Verifier {
    secret: SharedSecret,
    max_envelope_age: Duration,
}

impl Verifier {
    pub fn new(secret: SharedSecret, max_envelope_age: Duration) -> Self {
        Self {
            secret,
            max_envelope_age,
        }
    }

    pub fn with_default_age(secret: SharedSecret) -> Self {
        Self::new(secret, default_max_envelope_age())
    }

    /// Verify the text of a scanned code at instant `now`.  Every time
    /// comparison made for this attempt uses the same `now`.
    pub fn verify(&self, raw: &str, now: DateTime<Utc>) -> Verification {
        let now = to_millis(now);

        let res = match decode_envelope(raw) {
            Err(e) => Err(Rejection::InvalidFormat(e.to_string())),
            Ok(Decoded::Legacy(l)) => verify_legacy(l, now),
            Ok(Decoded::Signed(env)) => self.verify_signed(&env, now),
        };

        match &res {
            Ok(c) => tracing::debug!(
                identity = c.identity_id,
                assurance = ?c.assurance,
                "credential verified"
            ),
            Err(r) => tracing::warn!(reason = %r, "credential rejected"),
        }

        res
    }

    fn verify_signed(&self, env: &SignedEnvelope, now: i64) -> Verification {
        // unsigned field, bound to the signed issuance time below
        if env.timestamp > now {
            return Err(Rejection::InvalidFormat(
                "envelope timestamp is in the future".to_string(),
            ));
        }

        if now.saturating_sub(env.timestamp) > self.max_envelope_age.num_milliseconds() {
            return Err(Rejection::EnvelopeExpired);
        }

        // nothing in the payload may be looked at before this point
        match mac::verify(&self.secret, env.data.as_bytes(), &env.signature) {
            Ok(true) => {}
            Ok(false) => return Err(Rejection::TamperedOrInvalidSignature),
            Err(e) => return Err(Rejection::VerifierMalfunction(e.to_string())),
        }

        let p = decode_payload(&env.data).map_err(|e| Rejection::InvalidFormat(e.to_string()))?;

        if p.timestamp != env.timestamp {
            return Err(Rejection::InvalidFormat(format!(
                "envelope timestamp {} does not match payload timestamp {}",
                env.timestamp, p.timestamp
            )));
        }

        if now >= p.expires_at {
            return Err(Rejection::Expired);
        }

        // only checks that the issuing device recorded a fingerprint; the
        // verifying device is not bound
        if p.device_fingerprint.is_empty() {
            return Err(Rejection::InvalidDeviceBinding);
        }

        Ok(VerifiedClaim {
            identity_id: p.user_id,
            email: p.email,
            name: p.name,
            access_level: p.access_level,
            allowed_areas: p.allowed_areas,
            issued_at: from_millis(p.timestamp),
            expires_at: from_millis(p.expires_at),
            assurance: Assurance::Signed,
        })
    }
}

fn verify_legacy(l: LegacyPayload, now: i64) -> Verification {
    let (identity_id, name, access_level) = match (l.user_id, l.name, l.access_level) {
        (Some(id), Some(name), Some(level)) if id != 0 && !name.is_empty() => (id, name, level),
        _ => {
            return Err(Rejection::InvalidFormat(
                "legacy credential lacks user_id, name or access_level".to_string(),
            ))
        }
    };

    let access_level = access_level
        .parse::<AccessLevel>()
        .map_err(Rejection::InvalidFormat)?;

    if let Some(expires_at) = l.expires_at {
        if now >= expires_at {
            return Err(Rejection::Expired);
        }
    }

    Ok(VerifiedClaim {
        identity_id,
        email: l.email.unwrap_or_default(),
        name,
        access_level,
        allowed_areas: Vec::new(),
        issued_at: None,
        expires_at: l.expires_at.and_then(from_millis),
        assurance: Assurance::Unsigned,
    })
}

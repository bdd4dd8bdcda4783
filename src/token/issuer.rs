// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::{to_millis, FORMAT_VERSION};
use super::envelope::{encode_envelope, SignedEnvelope};
use super::errors::Error;
use super::mac::{self, SharedSecret};
use super::payload::{encode_payload, CredentialPayload};
use crate::store::Identity;
use chrono::{DateTime, Duration, Utc};

/// Builds and signs credentials on the issuing device.
#[derive(Debug, Clone)]
pub struct Issuer {
    secret: SharedSecret,
}

impl Issuer {
    pub fn new(secret: SharedSecret) -> Self {
        Self { secret }
    }

    /// Issue a signed envelope for `identity`, valid from `now` for `window`.
    ///
    /// The identity's allowed areas are copied into the payload as they are
    /// at this instant; later changes to the policy do not alter the issued
    /// credential.  Inactive identities are refused with
    /// [`Error::InactiveIdentity`] and nothing is produced.
    pub fn issue(
        &self,
        identity: &Identity,
        device_fingerprint: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<SignedEnvelope, Error> {
        if !identity.active {
            return Err(Error::InactiveIdentity(format!(
                "refusing to issue a credential for inactive identity {}",
                identity.email
            )));
        }

        if window <= Duration::zero() {
            return Err(Error::Sema(format!(
                "validity window must be positive, got {window}"
            )));
        }

        let timestamp = to_millis(now);
        let expires_at = timestamp
            .checked_add(window.num_milliseconds())
            .ok_or_else(|| Error::Sema("expiry overflows the timestamp range".to_string()))?;

        let payload = CredentialPayload {
            user_id: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            access_level: identity.access_level,
            allowed_areas: identity.allowed_areas.clone(),
            timestamp,
            expires_at,
            device_fingerprint: device_fingerprint.to_string(),
            version: FORMAT_VERSION.to_string(),
        };

        let data = encode_payload(&payload)?;
        let signature = mac::sign(&self.secret, data.as_bytes())?;

        tracing::debug!(
            identity = identity.id,
            expires_at,
            "issued credential"
        );

        Ok(SignedEnvelope {
            data,
            signature,
            timestamp,
        })
    }

    /// Same as [`Issuer::issue`], returning the text to render as a QR code
    pub fn issue_qr_text(
        &self,
        identity: &Identity,
        device_fingerprint: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<String, Error> {
        let env = self.issue(identity, device_fingerprint, now, window)?;

        encode_envelope(&env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AccessLevel;
    use crate::token::payload::decode_payload;
    use chrono::TimeZone;

    fn john() -> Identity {
        Identity {
            id: 1,
            email: "john.athlete@sports.com".to_string(),
            name: "John Athlete".to_string(),
            phone: Some("+1234567890".to_string()),
            access_level: AccessLevel::General,
            allowed_areas: vec![
                "Main Arena".to_string(),
                "General Entrance".to_string(),
                "Food Court".to_string(),
            ],
            active: true,
        }
    }

    fn issuer() -> Issuer {
        Issuer::new(SharedSecret::new("issuer-test-secret").unwrap())
    }

    #[test]
    fn issue_ok() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();

        let env = issuer()
            .issue(&john(), "device-fp", t0, Duration::hours(1))
            .unwrap();

        assert_eq!(env.timestamp, t0.timestamp_millis());
        assert_eq!(env.signature.len(), 64);

        let p = decode_payload(&env.data).unwrap();
        assert_eq!(p.user_id, 1);
        assert_eq!(p.timestamp, env.timestamp);
        assert_eq!(p.expires_at - p.timestamp, 3_600_000);
        assert_eq!(p.allowed_areas, john().allowed_areas);
        assert_eq!(p.device_fingerprint, "device-fp");
        assert_eq!(p.version, "2.0");
        assert!(!env.data.contains("+1234567890"));
    }

    #[test]
    fn issue_is_deterministic() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let i = issuer();

        let a = i.issue(&john(), "fp", t0, Duration::hours(1)).unwrap();
        let b = i.issue(&john(), "fp", t0, Duration::hours(1)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn snapshot_is_not_affected_by_later_changes() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let mut id = john();

        let env = issuer().issue(&id, "fp", t0, Duration::hours(1)).unwrap();
        id.allowed_areas.clear();

        let p = decode_payload(&env.data).unwrap();
        assert_eq!(p.allowed_areas.len(), 3);
    }

    #[test]
    fn inactive_identity_refused() {
        let mut id = john();
        id.active = false;

        let r = issuer().issue_qr_text(&id, "fp", Utc::now(), Duration::hours(1));

        assert!(matches!(r, Err(Error::InactiveIdentity(_))));
    }

    #[test]
    fn non_positive_window_refused() {
        let r = issuer().issue(&john(), "fp", Utc::now(), Duration::zero());

        assert!(matches!(r, Err(Error::Sema(_))));
    }
}

// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::FORMAT_VERSION;
use super::errors::Error;
use crate::store::AccessLevel;
use serde::{Deserialize, Serialize};

/// The signed claim carried by a v2 credential.
///
/// Field order is significant: the JSON text produced by [`encode_payload`]
/// is the MAC input, so it must be byte-for-byte identical on every issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayload {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub access_level: AccessLevel,
    /// Snapshot of the identity's areas at issuance time
    pub allowed_areas: Vec<String>,
    /// Issuance instant, ms since epoch
    pub timestamp: i64,
    /// Expiry instant, ms since epoch
    pub expires_at: i64,
    #[serde(default)]
    pub device_fingerprint: String,
    pub version: String,
}

impl CredentialPayload {
    fn validate(&self) -> Result<(), Error> {
        if self.version != FORMAT_VERSION {
            return Err(Error::Sema(format!(
                "unsupported payload version {}",
                self.version
            )));
        }

        if self.expires_at <= self.timestamp {
            return Err(Error::Sema(format!(
                "expires_at ({}) is not after timestamp ({})",
                self.expires_at, self.timestamp
            )));
        }

        Ok(())
    }
}

/// Serialize a payload to the exact text that gets signed
pub fn encode_payload(p: &CredentialPayload) -> Result<String, Error> {
    serde_json::to_string(p).map_err(|e| Error::Syntax(e.to_string()))
}

/// Decode and validate the inner payload of a signed envelope
pub fn decode_payload(data: &str) -> Result<CredentialPayload, Error> {
    let p: CredentialPayload =
        serde_json::from_str(data).map_err(|e| Error::Syntax(e.to_string()))?;

    p.validate()?;

    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CredentialPayload {
        CredentialPayload {
            user_id: 1,
            email: "john.athlete@sports.com".to_string(),
            name: "John Athlete".to_string(),
            access_level: AccessLevel::General,
            allowed_areas: vec!["Main Arena".to_string(), "Food Court".to_string()],
            timestamp: 1_700_000_000_000,
            expires_at: 1_700_003_600_000,
            device_fingerprint: "fp".to_string(),
            version: FORMAT_VERSION.to_string(),
        }
    }

    #[test]
    fn encode_has_fixed_field_order() {
        let j = encode_payload(&sample()).unwrap();

        assert_eq!(
            j,
            r#"{"user_id":1,"email":"john.athlete@sports.com","name":"John Athlete","access_level":"General","allowed_areas":["Main Arena","Food Court"],"timestamp":1700000000000,"expires_at":1700003600000,"device_fingerprint":"fp","version":"2.0"}"#
        );
    }

    #[test]
    fn decode_accepts_any_key_order() {
        let j = r#"{"version":"2.0","device_fingerprint":"fp","expires_at":1700003600000,
            "timestamp":1700000000000,"allowed_areas":["Main Arena","Food Court"],
            "access_level":"General","name":"John Athlete","email":"john.athlete@sports.com","user_id":1}"#;

        assert_eq!(decode_payload(j).unwrap(), sample());
    }

    #[test]
    fn decode_missing_fingerprint_is_empty() {
        let mut p = sample();
        p.device_fingerprint.clear();
        let j = encode_payload(&p)
            .unwrap()
            .replace(r#""device_fingerprint":"","#, "");

        assert_eq!(decode_payload(&j).unwrap().device_fingerprint, "");
    }

    #[test]
    fn decode_rejects_missing_expiry() {
        let j = encode_payload(&sample())
            .unwrap()
            .replace(r#""expires_at":1700003600000,"#, "");

        assert!(matches!(decode_payload(&j), Err(Error::Syntax(_))));
    }

    #[test]
    fn decode_rejects_inverted_window() {
        let mut p = sample();
        p.expires_at = p.timestamp;

        let j = encode_payload(&p).unwrap();

        assert!(matches!(decode_payload(&j), Err(Error::Sema(_))));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut p = sample();
        p.version = "3.0".to_string();

        let j = encode_payload(&p).unwrap();

        assert!(matches!(decode_payload(&j), Err(Error::Sema(_))));
    }
}

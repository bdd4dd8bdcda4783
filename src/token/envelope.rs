// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wire object rendered into the QR code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// The exact serialized payload.  It is treated as an opaque string for
    /// MAC purposes and is never re-encoded before verification.
    pub data: String,

    /// Lowercase hex HMAC-SHA256 of `data`
    pub signature: String,

    /// Issuance instant (ms since epoch); equal to the payload's `timestamp`
    pub timestamp: i64,
}

/// A credential in the unsigned format that predates [`SignedEnvelope`].
/// Every field is optional at the decoding stage; the verifier decides which
/// ones are required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPayload {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub access_level: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Result of structurally decoding scanned text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Signed(SignedEnvelope),
    Legacy(LegacyPayload),
}

const ENVELOPE_KEYS: [&str; 3] = ["data", "signature", "timestamp"];

/// Decode the text of a scanned code.
///
/// A JSON object carrying all of `data`, `signature` and `timestamp` with the
/// right types is a signed envelope.  Any other JSON object is tried as a
/// legacy payload.  Everything else is [`Error::MalformedInput`].
pub fn decode_envelope(raw: &str) -> Result<Decoded, Error> {
    let v: Value =
        serde_json::from_str(raw.trim()).map_err(|e| Error::MalformedInput(e.to_string()))?;

    let obj = match &v {
        Value::Object(m) => m,
        _ => return Err(Error::MalformedInput("expecting a JSON object".to_string())),
    };

    if ENVELOPE_KEYS.iter().all(|k| obj.contains_key(*k)) {
        if let Ok(env) = SignedEnvelope::deserialize(&v) {
            return Ok(Decoded::Signed(env));
        }
    }

    LegacyPayload::deserialize(&v)
        .map(Decoded::Legacy)
        .map_err(|e| Error::MalformedInput(e.to_string()))
}

/// Produce the QR text for an envelope
pub fn encode_envelope(env: &SignedEnvelope) -> Result<String, Error> {
    serde_json::to_string(env).map_err(|e| Error::Syntax(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_signed() {
        let raw = r#"{"data":"{\"user_id\":1}","signature":"abcd","timestamp":1700000000000}"#;

        let d = decode_envelope(raw).unwrap();

        assert_eq!(
            d,
            Decoded::Signed(SignedEnvelope {
                data: r#"{"user_id":1}"#.to_string(),
                signature: "abcd".to_string(),
                timestamp: 1_700_000_000_000,
            })
        );
    }

    #[test]
    fn encode_then_decode_keeps_data_verbatim() {
        let env = SignedEnvelope {
            data: "{ \"odd\" :  \"spacing\" }".to_string(),
            signature: "00ff".to_string(),
            timestamp: 42,
        };

        let raw = encode_envelope(&env).unwrap();

        assert_eq!(decode_envelope(&raw).unwrap(), Decoded::Signed(env));
    }

    #[test]
    fn decode_legacy() {
        let raw = r#"{"user_id":7,"name":"Alex Media","access_level":"General","email":"alex.media@news.com"}"#;

        match decode_envelope(raw).unwrap() {
            Decoded::Legacy(l) => {
                assert_eq!(l.user_id, Some(7));
                assert_eq!(l.email.as_deref(), Some("alex.media@news.com"));
                assert!(l.expires_at.is_none());
            }
            other => panic!("expecting legacy, got {other:?}"),
        }
    }

    #[test]
    fn envelope_with_wrong_types_falls_back_to_legacy() {
        // timestamp is a string: not a signed envelope
        let raw = r#"{"data":"x","signature":"y","timestamp":"1700000000000"}"#;

        assert_eq!(
            decode_envelope(raw).unwrap(),
            Decoded::Legacy(LegacyPayload::default())
        );
    }

    #[test]
    fn partial_envelope_is_legacy() {
        let raw = r#"{"data":"x","signature":"y"}"#;

        assert!(matches!(decode_envelope(raw), Ok(Decoded::Legacy(_))));
    }

    #[test]
    fn garbage_is_malformed() {
        for raw in [
            "",
            "   ",
            "not json",
            "[1,2,3]",
            "42",
            "\"string\"",
            "null",
            "{\"user_id\":",
            "{\"user_id\":\"seven\"}",
            "\u{0}\u{1}",
        ] {
            assert!(
                matches!(decode_envelope(raw), Err(Error::MalformedInput(_))),
                "input {raw:?}"
            );
        }
    }
}

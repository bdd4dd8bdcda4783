// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use openssl::hash::MessageDigest;
use openssl::memcmp;
use openssl::pkey::PKey;
use openssl::sign::Signer;

/// The symmetric key shared out-of-band between issuing and verifying
/// deployments.  Its `Debug` output never shows the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let s = secret.into();

        if s.is_empty() {
            return Err(Error::MissingSecret("shared secret is empty".to_string()));
        }

        Ok(Self(s))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret(<{} bytes redacted>)", self.0.len())
    }
}

/// Compute HMAC-SHA256 over `data` and return it as lowercase hex
pub fn sign(secret: &SharedSecret, data: &[u8]) -> Result<String, Error> {
    let key = PKey::hmac(secret.as_bytes()).map_err(|e| Error::Mac(format!("{e:?}")))?;

    let mut signer =
        Signer::new(MessageDigest::sha256(), &key).map_err(|e| Error::Mac(format!("{e:?}")))?;

    signer
        .update(data)
        .map_err(|e| Error::Mac(format!("{e:?}")))?;

    let tag = signer
        .sign_to_vec()
        .map_err(|e| Error::Mac(format!("{e:?}")))?;

    Ok(hex::encode(tag))
}

/// Check a hex signature against `data`.  The comparison is on the exact
/// hex text and runs in constant time for equal-length inputs.
pub fn verify(secret: &SharedSecret, data: &[u8], signature: &str) -> Result<bool, Error> {
    let expected = sign(secret, data)?;

    if expected.len() != signature.len() {
        return Ok(false);
    }

    Ok(memcmp::eq(expected.as_bytes(), signature.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231, test case 2
    const RFC4231_KEY: &[u8] = b"Jefe";
    const RFC4231_DATA: &[u8] = b"what do ya want for nothing?";
    const RFC4231_MAC: [u8; 32] =
        hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");

    #[test]
    fn known_answer() {
        let s = SharedSecret::new(RFC4231_KEY).unwrap();

        let tag = sign(&s, RFC4231_DATA).unwrap();

        assert_eq!(tag, hex::encode(RFC4231_MAC));
    }

    #[test]
    fn verify_ok_and_mismatch() {
        let s = SharedSecret::new(RFC4231_KEY).unwrap();
        let good = hex::encode(RFC4231_MAC);

        assert_eq!(verify(&s, RFC4231_DATA, &good), Ok(true));
        assert_eq!(verify(&s, b"what do ya want for nothing!", &good), Ok(false));
        assert_eq!(verify(&s, RFC4231_DATA, &good[..63]), Ok(false));
        assert_eq!(verify(&s, RFC4231_DATA, &good.to_uppercase()), Ok(false));

        let other = SharedSecret::new("not jefe").unwrap();
        assert_eq!(verify(&other, RFC4231_DATA, &good), Ok(false));
    }

    #[test]
    fn empty_secret_refused() {
        assert!(matches!(
            SharedSecret::new(""),
            Err(Error::MissingSecret(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let s = SharedSecret::new("event_secret").unwrap();

        assert!(!format!("{s:?}").contains("event_secret"));
    }
}

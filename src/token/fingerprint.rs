// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use openssl::sha::sha256;

/// Derive the opaque device fingerprint recorded in a credential from the
/// issuing device's identifiers (build id, device name, OS version, ...).
/// Missing identifiers should be passed as "unknown" so that the derivation
/// stays stable on a given device.
pub fn derive<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<&str>>()
        .join("-");

    hex::encode(sha256(joined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_sha256_of_joined_parts() {
        // sha256("abc")
        assert_eq!(
            derive(&["abc"]),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(derive(&["a", "b", "c"]), derive(&["a-b-c"]));
        assert_ne!(derive(&["a", "b"]), derive(&["b", "a"]));
        assert_eq!(derive(&["x"]).len(), 64);
    }
}

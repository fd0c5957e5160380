//! Salted password hashing for collaborator credentials.
//!
//! `hash = hex(SHA3-256(password || salt))`, with a per-collaborator random
//! salt stored hex-encoded next to the hash. There is no way back from a
//! hash to a password; recovering an account means deriving new credentials.

use rand::Rng;
use sha3::{Digest, Sha3_256};

/// Random bytes per salt when no configuration is supplied.
pub const DEFAULT_SALT_BYTES: usize = 8;

/// Output of [`derive`]: what gets persisted for a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCredentials {
    pub hash: String,
    pub salt: String,
}

/// Derive a hash for `password` under a fresh salt of the default width.
#[must_use]
pub fn derive(password: &str) -> DerivedCredentials {
    derive_with_salt_bytes(password, DEFAULT_SALT_BYTES)
}

#[must_use]
pub fn derive_with_salt_bytes(password: &str, salt_bytes: usize) -> DerivedCredentials {
    let salt = generate_salt(salt_bytes);
    let hash = hash_with_salt(password, &salt);
    DerivedCredentials { hash, salt }
}

/// Hex SHA3-256 of the password followed by the salt text.
#[must_use]
pub fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    to_hex(&hasher.finalize())
}

/// True only when `password` under `salt` reproduces `expected_hash` exactly.
#[must_use]
pub fn verify(password: &str, salt: &str, expected_hash: &str) -> bool {
    let computed = hash_with_salt(password, salt);
    constant_time_eq(computed.as_bytes(), expected_hash.as_bytes())
}

fn generate_salt(salt_bytes: usize) -> String {
    let mut bytes = vec![0u8; salt_bytes];
    rand::rng().fill(bytes.as_mut_slice());
    to_hex(&bytes)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_hash_of_same_password_and_salt() {
        for (password, salt) in [("pw123", "0011223344556677"), ("", "ab"), ("é€🙂", "ff")] {
            let hash = hash_with_salt(password, salt);
            assert!(verify(password, salt, &hash));
        }
    }

    #[test]
    fn verify_rejects_wrong_password_or_salt() {
        let hash = hash_with_salt("pw123", "aaaa");
        assert!(!verify("pw124", "aaaa", &hash));
        assert!(!verify("pw123", "aaab", &hash));
        assert!(!verify("pw123", "aaaa", &hash[..hash.len() - 1]));
    }

    #[test]
    fn different_passwords_same_salt_differ() {
        assert_ne!(hash_with_salt("alpha", "salt"), hash_with_salt("beta", "salt"));
    }

    #[test]
    fn derive_uses_fresh_salt_each_time() {
        let first = derive("same password");
        let second = derive("same password");
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn derive_output_shape() {
        let creds = derive("pw");
        assert_eq!(creds.salt.len(), DEFAULT_SALT_BYTES * 2);
        assert_eq!(creds.hash.len(), 64);
        assert!(creds.salt.bytes().all(|b| b.is_ascii_hexdigit()));
        assert!(verify("pw", &creds.salt, &creds.hash));
    }

    #[test]
    fn matches_known_sha3_vector() {
        // SHA3-256("abc")
        assert_eq!(
            hash_with_salt("ab", "c"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }
}

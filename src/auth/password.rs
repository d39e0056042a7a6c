//! Password digests
//!
//! Passwords are stored as a plain SHA-256 hex digest, without salt or a
//! per-user work factor. Not suitable for a production deployment.
use ring::digest::{digest, SHA256};
use std::fmt::Write;

/// Returns the hex encoded SHA-256 digest of the given password.
pub fn digest_password(password: &str) -> String {
    let hash = digest(&SHA256, password.as_bytes());

    let mut hex = String::with_capacity(hash.as_ref().len() * 2);

    for byte in hash.as_ref() {
        // writing to a String cannot fail
        let _ = write!(hex, "{:02x}", byte);
    }

    hex
}

/// Checks a plaintext password against a stored digest.
pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    digest_password(password) == stored_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            digest_password("secret1"),
            "5b11618c2e44027877d0cd0921ed166b9f176f50587fc91e7534dd2946db77d6"
        );
    }

    #[test]
    fn verify_accepts_matching_password() {
        let stored = digest_password("secret1");

        assert!(verify_password("secret1", &stored));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let stored = digest_password("secret1");

        assert!(!verify_password("secret2", &stored));
        assert!(!verify_password("", &stored));
    }
}

//! # Password Digest
//!
//! Digest helper for the credential store.
//!
//! Passwords are stored as unsalted single-pass SHA-256 hex digests.
//! This matches every database already in the field, so verification
//! must keep producing identical digests. A salted KDF would be the
//! better scheme for new installs, but switching invalidates existing
//! hashes and is left to a dedicated migration.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a password.
///
/// ## Example
/// ```rust
/// use darzi_core::auth::hash_password;
///
/// let digest = hash_password("password");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-shape digest comparison used by the login gate.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // SHA-256("password"), the digest seeded for the default admin
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_verify() {
        let digest = hash_password("hunter22");
        assert!(verify_password("hunter22", &digest));
        assert!(!verify_password("hunter23", &digest));
        assert!(!verify_password("hunter22", "not-a-digest"));
    }

    #[test]
    fn test_digests_differ_per_password() {
        assert_ne!(hash_password("a"), hash_password("b"));
    }
}

//! Cache key derivation.
//!
//! Session identifiers are bearer secrets, so they never appear in Redis
//! verbatim: the key holds their SHA-256 digest.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `value`.
pub fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Key of the session identified by `session_id`.
pub fn session(prefix: &str, session_id: &str) -> String {
    format!("{}session:{}", prefix, digest(session_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_hides_id() {
        let key = session("superset_", "abc123");
        assert!(key.starts_with("superset_session:"));
        assert!(!key.contains("abc123"));
        assert_eq!(key.len(), "superset_session:".len() + 64);
    }

    #[test]
    fn test_session_key_is_stable() {
        assert_eq!(session("p_", "same"), session("p_", "same"));
        assert_ne!(session("p_", "one"), session("p_", "two"));
    }
}

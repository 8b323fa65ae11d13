use dusys_core::{hash_password, verify_password};

#[test]
fn test_hash_and_verify() {
    let hash = hash_password("correct horse").unwrap();

    assert_ne!(hash, "correct horse");
    assert!(verify_password("correct horse", &hash).unwrap());
    assert!(!verify_password("battery staple", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password("same").unwrap();
    let second = hash_password("same").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_malformed_hash_is_an_error() {
    assert!(verify_password("x", "not-a-bcrypt-hash").is_err());
}

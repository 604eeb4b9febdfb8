use dormex_core::{hash_password, verify_password};

#[test]
fn test_hash_is_salted() {
    let first = hash_password("hostelpass").unwrap();
    let second = hash_password("hostelpass").unwrap();

    assert_ne!(first, "hostelpass");
    assert_ne!(first, second);
}

#[test]
fn test_verify_password_correct_and_incorrect() {
    let hash = hash_password("correctpassword").unwrap();

    assert!(verify_password("correctpassword", &hash).unwrap());
    assert!(!verify_password("wrongpassword", &hash).unwrap());
}

#[test]
fn test_verify_against_malformed_hash_errors() {
    assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
}

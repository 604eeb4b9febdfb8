use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hashed = hash_password("hostel-pass").unwrap();
        assert_ne!(hashed, "hostel-pass");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn test_verify_matching_and_wrong_password() {
        let hashed = hash_password("hostel-pass").unwrap();
        assert!(verify_password("hostel-pass", &hashed).unwrap());
        assert!(!verify_password("other-pass", &hashed).unwrap());
    }

    #[test]
    fn test_verify_against_garbage_hash_errors() {
        assert!(verify_password("hostel-pass", "not-a-bcrypt-hash").is_err());
    }
}

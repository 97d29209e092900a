use bcrypt::{hash, verify};
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

pub const TOKEN_LENGTH: usize = 32;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Opaque session token: 32 alphanumeric characters drawn from the OS RNG.
pub fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_alphanumeric_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_round_trip() {
        let hashed = hash_password("user123", 4).unwrap();
        assert!(verify_password("user123", &hashed).unwrap());
        assert!(!verify_password("user1234", &hashed).unwrap());
    }
}

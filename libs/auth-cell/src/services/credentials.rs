use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};

/// Credential hashing and verification. Verification happens here, against
/// the stored hash, never as an equality filter in a data-service query.
pub struct CredentialService;

impl CredentialService {
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = CredentialService::hash_password("clinic-password-1").unwrap();
        assert!(CredentialService::verify_password("clinic-password-1", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = CredentialService::hash_password("clinic-password-1").unwrap();
        assert!(!CredentialService::verify_password("not-the-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_match() {
        assert!(CredentialService::verify_password("anything", "not-a-phc-string").is_err());
    }
}

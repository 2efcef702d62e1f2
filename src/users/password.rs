use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::error;

// The empty string is a legal input: an omitted password on create or
// replace stores the hash of "".
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn hash_verifies_against_the_input() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        let parsed = PasswordHash::new(&hash).expect("hash should parse");
        assert!(Argon2::default()
            .verify_password(b"Secur3P@ssw0rd!", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong-password", &parsed)
            .is_err());
    }

    #[test]
    fn empty_password_hashes() {
        let hash = hash_password("").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn salts_differ_between_calls() {
        let a = hash_password("same-input").expect("hashing should succeed");
        let b = hash_password("same-input").expect("hashing should succeed");
        assert_ne!(a, b);
    }
}

/// Password hashing with Argon2id
///
/// Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), which carry the
/// algorithm, parameters, and salt. A PHC string is always longer than the
/// 60 characters the `users` table requires.
///
/// ```
/// use tasklane_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery staple")?;
/// assert!(verify_password("correct horse battery staple", &hash)?);
/// assert!(!verify_password("Tr0ub4dor&3", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};

/// Memory cost in KiB (19 MiB)
const MEMORY_COST_KIB: u32 = 19_456;
/// Number of passes
const TIME_COST: u32 = 2;
/// Degree of parallelism
const PARALLELISM: u32 = 1;

/// Shortest accepted plaintext password
pub const MIN_PASSWORD_CHARS: usize = 8;
/// Longest accepted plaintext password
pub const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// The stored hash is not a PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password and an error only when the
/// stored hash cannot be parsed or verification itself fails. Parameters are
/// read from the hash, so hashes made with older settings still verify.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(PasswordError::InvalidHash("Hash is missing its salt or output".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Rejects passwords that are too short, too long, or blank
///
/// Lengths are counted in characters. The message is suitable for showing to
/// the user.
pub fn check_password_policy(password: &str) -> Result<(), String> {
    let chars = password.chars().count();

    if password.trim().is_empty() {
        return Err("Password must not be blank".to_string());
    }
    if chars < MIN_PASSWORD_CHARS {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        ));
    }
    if chars > MAX_PASSWORD_CHARS {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_CHARS
        ));
    }

    Ok(())
}

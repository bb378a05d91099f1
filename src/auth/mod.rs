//! Authentication module
//!
//! JWT bearer authentication:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated caller context, usable as an extractor
//! - [`hash_password`] / [`verify_password`] - argon2 password handling

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

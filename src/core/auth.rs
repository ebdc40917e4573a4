//! Password hashing, password policy and bearer token parsing

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use rand::rngs::OsRng;

use crate::core::error::{SocialError, ValidationError};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "admin123",
    "passw0rd",
    "trustno1",
    "abc12345",
    "superman",
];

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String, SocialError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SocialError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash; malformed hashes never verify
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Run an Argon2 call on the blocking pool so it never stalls the runtime
async fn on_blocking_pool<T>(work: impl FnOnce() -> T + Send + 'static) -> Result<T, SocialError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SocialError::Internal(format!("Password task failed: {}", e)))
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_async(password: String) -> Result<String, SocialError> {
    on_blocking_pool(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, SocialError> {
    on_blocking_pool(move || verify_password(&password, &hash)).await
}

/// Reject weak passwords.
///
/// A password must be at least [`MIN_PASSWORD_LENGTH`] characters, not
/// entirely numeric, not a well-known common password, and must not
/// contain the username.
pub fn validate_password(password: &str, username: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::field(
            "password",
            format!(
                "password must contain at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::field(
            "password",
            "password is entirely numeric",
        ));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(ValidationError::field("password", "password is too common"));
    }

    let username = username.trim().to_lowercase();
    if !username.is_empty() && lowered.contains(&username) {
        return Err(ValidationError::field(
            "password",
            "password is too similar to the username",
        ));
    }

    Ok(())
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

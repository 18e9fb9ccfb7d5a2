use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Claims carried by an access token. The subject is the user's email,
/// which is the unique handle the credential store is keyed on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    Generation(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("JWT secret not configured")]
    MissingSecret,
}

/// Issue a signed access token for the given subject.
pub fn issue_token(subject: &str) -> Result<String, TokenError> {
    encode_claims(&Claims::new(subject))
}

fn encode_claims(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify a token and return its subject. Bad signatures, malformed tokens
/// and expired tokens all collapse into InvalidToken.
pub fn verify_token(token: &str) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|_| TokenError::InvalidToken)?;

    Ok(token_data.claims.sub)
}

/// Hash a password for storage using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, ApiHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiHashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. Returns false for a mismatch,
/// errors only when the stored hash itself is unparseable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| ApiHashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Error)]
#[error("Password hashing error: {0}")]
pub struct ApiHashError(String);

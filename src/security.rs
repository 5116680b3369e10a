use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::constants::{SECURITY_CODE, TOKEN_TTL_SECS};

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password with Argon2id, returning a PHC-format string
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Failed to hash password: {}", e))
}

/// Verify a password against a stored PHC-format hash
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check the shared login security code
pub fn verify_security_code(code: &str) -> bool {
    code == SECURITY_CODE
}

// =============================================================================
// Tokens (HS256 JWT)
// =============================================================================

/// Claims carried by the login token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Expiry as a Unix timestamp in seconds
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid signing key")]
    InvalidKey,
}

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

fn signer(secret: &str) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::InvalidKey)
}

/// Mint a token for `user_id` that expires `TOKEN_TTL_SECS` after `now`
pub fn mint_token(user_id: i64, now: i64, secret: &str) -> Result<String, TokenError> {
    let claims = Claims {
        user_id,
        exp: now + TOKEN_TTL_SECS,
    };
    let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = signer(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verify signature and expiry of a token produced by [`mint_token`]
pub fn verify_token(token: &str, now: i64, secret: &str) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
    if header["alg"] != "HS256" {
        return Err(TokenError::Malformed);
    }

    let sig_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::Malformed)?;

    let mut mac = signer(secret)?;
    mac.update(header_part_and_payload(token).as_bytes());
    mac.verify_slice(&sig_bytes)
        .map_err(|_| TokenError::InvalidSignature)?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    let claims: Claims =
        serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::Malformed)?;

    if claims.exp <= now {
        tracing::warn!("Expired token for user {}", claims.user_id);
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// The signed portion of a token: everything before the last dot
fn header_part_and_payload(token: &str) -> &str {
    token.rsplit_once('.').map(|(head, _)| head).unwrap_or(token)
}

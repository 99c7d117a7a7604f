//! JWT access-token issuance and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued token, in seconds.
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Errors returned by [`validate_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
///
/// Role is deliberately absent: it is re-read from the user record on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign an HS256 token for `user_id` that expires [`TOKEN_TTL_SECS`] from now.
///
/// Returns the token and its expiry timestamp.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    let exp = now_secs() + TOKEN_TTL_SECS;
    let token = issue_token_with_exp(user_id, secret, exp)?;
    Ok((token, exp))
}

/// Sign a token with an explicit expiry. Tests use this to mint expired tokens.
pub fn issue_token_with_exp(
    user_id: Uuid,
    secret: &str,
    exp: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a token and return the user ID from its `sub` claim.
///
/// Validation: HS256, exp checked with the library's default 60s leeway, required claims
/// `exp` + `sub`.
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    data.claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod access;
pub mod password;

pub use access::{can_access, resolve_hostel_for_role};
pub use password::{hash_password, verify_password, PasswordError};

/// Claims carried by the session cookie. The cookie only names the session;
/// everything else lives in the session store.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sid: Uuid, ttl_secs: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_secs as i64)).timestamp();

        Self {
            sid,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Session token generation error: {0}")]
    Generation(String),

    #[error("Invalid session token: {0}")]
    Invalid(String),

    #[error("Session secret not configured")]
    InvalidSecret,
}

pub fn generate_session_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Validate a session token and return the session id it names
pub fn validate_session_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

    Ok(token_data.claims.sid)
}

//! Bearer token issuance and verification (HS256 JWT)

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{AuthUser, Role};

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub role: Role,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl From<&Claims> for AuthUser {
    fn from(claims: &Claims) -> Self {
        AuthUser {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Longest accepted token lifetime (ten years)
pub const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[hidden]")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl TokenService {
    /// Lifetimes above [`MAX_TTL_HOURS`] are clamped to it.
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        let ttl_hours = ttl_hours.min(MAX_TTL_HOURS) as i64;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    /// Issues a token for `user_id` with `role`.
    pub fn issue(&self, user_id: i64, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Forbidden("Invalid token".to_string()))
    }
}

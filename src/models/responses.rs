//! Response DTOs for the pet store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::domain::{Role, User};

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response body for POST /api/auth/register
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

impl RegisterResponse {
    pub fn new(user: UserSummary) -> Self {
        Self {
            message: "User registered".to_string(),
            user,
        }
    }
}

/// Response body for POST /api/auth/login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for POST /api/pets/:id/upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub uploaded: usize,
}

impl UploadResponse {
    pub fn new(uploaded: usize) -> Self {
        Self {
            message: "Images uploaded successfully".to_string(),
            uploaded,
        }
    }
}

/// Response body for the list-cache stats endpoint (GET /api/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of list reads served from cache
    pub hits: u64,
    /// Number of list reads that went to persistence
    pub misses: u64,
    /// Number of namespace invalidations performed
    pub invalidations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

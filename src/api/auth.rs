//! Auth Handlers
//!
//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::extract::ValidatedJson;
use super::handlers::AppState;
use crate::error::Result;
use crate::models::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};

/// Handler for POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = state.auth.register(request).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::new(user))))
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state.auth.login(request).await?;

    Ok(Json(TokenResponse { token }))
}

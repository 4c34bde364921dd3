//! Request Extractors
//!
//! Bearer-token authentication and validated JSON bodies.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::handlers::AppState;
use crate::error::AppError;
use crate::models::AuthUser;
use crate::validation::validate;

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// == Authenticated ==
/// Any caller holding a valid token.
///
/// Missing token is 401, a bad or expired token is 403.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Token missing".to_string()))?;

        let claims = state.auth.tokens().verify(token)?;
        debug!(user_id = claims.user_id, "request authenticated");

        Ok(Authenticated(AuthUser::from(&claims)))
    }
}

// == Admin Only ==
/// A caller whose token carries the ADMIN role.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(user) = Authenticated::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(AdminOnly(user))
    }
}

// == Validated Json ==
/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies and rule violations both reject with 400 and a list of
/// field errors.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;

        let errors = validate(&payload);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(ValidatedJson(payload))
    }
}

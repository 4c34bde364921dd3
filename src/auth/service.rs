//! Registration and login

use std::sync::Arc;

use tracing::{debug, info};

use super::password::PasswordHasher;
use super::token::TokenService;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, NewUser, RegisterRequest, UserSummary};

fn invalid_credentials() -> AppError {
    AppError::BadRequest("Invalid credentials".to_string())
}

/// Account operations over a [`UserRepository`].
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates an account. Duplicate emails are a bad request.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserSummary> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already exists".to_string()));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                email: request.email,
                password_hash,
                role: request.role,
            })
            .await?;

        info!(user_id = user.id, role = user.role.as_str(), "user registered");
        Ok(UserSummary::from(&user))
    }

    /// Verifies credentials and issues a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<String> {
        let Some(user) = self.users.find_by_email(&request.email).await? else {
            debug!("login for unknown email");
            return Err(invalid_credentials());
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            debug!(user_id = user.id, "login with wrong password");
            return Err(invalid_credentials());
        }

        self.tokens.issue(user.id, user.role)
    }
}

//! Auth Module
//!
//! Password hashing, stateless bearer tokens and the register/login flow.

mod password;
mod service;
mod token;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::AuthService;
pub use token::{Claims, TokenService};

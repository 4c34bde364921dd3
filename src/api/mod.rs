//! API Module
//!
//! HTTP handlers, extractors and routing for the pet store REST API.
//!
//! # Endpoints
//! - `POST /api/auth/register` - Create an account
//! - `POST /api/auth/login` - Exchange credentials for a bearer token
//! - `GET /api/pets` - List pets (cache-aside)
//! - `GET /api/pets/:id` - Fetch one pet (uncached)
//! - `POST /api/pets` - Create a pet (authenticated)
//! - `PUT|PATCH /api/pets/:id` - Replace a pet (authenticated)
//! - `DELETE /api/pets/:id` - Delete a pet (admin)
//! - `POST /api/pets/:id/upload` - Upload pet images (admin)
//! - `GET /api/cache/stats` - List cache counters
//! - `GET /health` - Health check endpoint
//!
//! Every route is rate limited per client IP.

pub mod auth;
pub mod extract;
pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

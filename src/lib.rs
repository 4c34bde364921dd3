//! Pet Store - REST backend for a pet-store application
//!
//! User registration and login with bearer tokens, pet CRUD with image
//! upload, and a cache-aside read path on the pet list.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pets;
pub mod tasks;
pub mod uploads;
pub mod validation;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;

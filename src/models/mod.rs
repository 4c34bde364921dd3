//! Domain entities and request/response models for the pet store API
//!
//! This module defines the records owned by persistence and the DTOs used
//! for serializing/deserializing HTTP request and response bodies.

pub mod domain;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use domain::{AuthUser, NewPet, NewUser, Pet, PetChanges, PetFilters, PetImage, Role, User};
pub use requests::{ImageInput, LoginRequest, PetRequest, RegisterRequest};
pub use responses::{
    HealthResponse, MessageResponse, RegisterResponse, StatsResponse, TokenResponse,
    UploadResponse, UserSummary,
};

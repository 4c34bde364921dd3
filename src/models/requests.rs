//! Request DTOs for the pet store API
//!
//! Defines the structure of incoming HTTP request bodies and their
//! validation rules.

use serde::Deserialize;
use validator::Validate;

use super::domain::{NewPet, PetChanges, Role};

/// Request body for POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be longer than or equal to 6 characters"))]
    pub password: String,
    /// Defaults to USER when omitted
    #[serde(default)]
    pub role: Role,
}

/// Request body for POST /api/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

/// Image reference supplied inline on pet creation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImageInput {
    #[validate(length(min = 1, message = "url should not be empty"))]
    pub url: String,
}

/// Request body for creating or replacing a pet
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(range(min = 0, max = 100, message = "age must be between 0 and 100"))]
    pub age: i64,
    pub breed: String,
    /// Only honoured on creation
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<ImageInput>,
}

impl PetRequest {
    pub fn into_new_pet(self) -> NewPet {
        NewPet {
            name: self.name,
            kind: self.kind,
            age: self.age,
            breed: self.breed,
            image_urls: self.images.into_iter().map(|img| img.url).collect(),
        }
    }

    pub fn into_changes(self) -> PetChanges {
        PetChanges {
            name: self.name,
            kind: self.kind,
            age: self.age,
            breed: self.breed,
        }
    }
}

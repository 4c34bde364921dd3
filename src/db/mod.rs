//! Persistence Module
//!
//! Repository traits for users, pets and pet images, plus in-memory
//! implementations. A relational backend plugs in behind the same traits.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewPet, NewUser, Pet, PetChanges, PetFilters, User};

pub use memory::{InMemoryPetRepository, InMemoryUserRepository};

/// Pet and image storage.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Pets matching every populated filter, ascending by id.
    async fn find_many(&self, filters: &PetFilters) -> Result<Vec<Pet>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>>;

    /// Inserts the pet and its inline images.
    async fn create(&self, pet: NewPet) -> Result<Pet>;

    /// Replaces the scalar fields. `None` when the pet does not exist.
    async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>>;

    /// Deletes the pet and its images. `false` when the pet does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Attaches images to an existing pet, skipping urls it already has.
    ///
    /// Returns the number of images inserted, or `None` when the pet does
    /// not exist.
    async fn add_images(&self, id: i64, urls: Vec<String>) -> Result<Option<usize>>;
}

/// User account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Inserts a user. Fails with a bad request when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User>;
}

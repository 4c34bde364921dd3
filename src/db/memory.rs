//! In-memory repositories

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PetRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{NewPet, NewUser, Pet, PetChanges, PetFilters, PetImage, User};

// == Pets ==
#[derive(Debug, Default)]
struct PetTables {
    /// Pets without images, keyed by id
    pets: BTreeMap<i64, Pet>,
    /// Images keyed by id; `pet_id` references `pets`
    images: BTreeMap<i64, PetImage>,
    last_pet_id: i64,
    last_image_id: i64,
}

impl PetTables {
    fn with_images(&self, pet: &Pet) -> Pet {
        let mut pet = pet.clone();
        pet.images = self
            .images
            .values()
            .filter(|img| img.pet_id == pet.id)
            .cloned()
            .collect();
        pet
    }

    fn insert_image(&mut self, pet_id: i64, url: String) {
        self.last_image_id += 1;
        let id = self.last_image_id;
        self.images.insert(id, PetImage { id, url, pet_id });
    }
}

/// Pet repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPetRepository {
    tables: RwLock<PetTables>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn find_many(&self, filters: &PetFilters) -> Result<Vec<Pet>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pets
            .values()
            .filter(|pet| filters.matches(pet))
            .map(|pet| tables.with_images(pet))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>> {
        let tables = self.tables.read().await;
        Ok(tables.pets.get(&id).map(|pet| tables.with_images(pet)))
    }

    async fn create(&self, pet: NewPet) -> Result<Pet> {
        let mut tables = self.tables.write().await;

        tables.last_pet_id += 1;
        let id = tables.last_pet_id;
        let record = Pet {
            id,
            name: pet.name,
            kind: pet.kind,
            age: pet.age,
            breed: pet.breed,
            images: Vec::new(),
        };
        tables.pets.insert(id, record.clone());

        for url in pet.image_urls {
            tables.insert_image(id, url);
        }

        Ok(tables.with_images(&record))
    }

    async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>> {
        let mut tables = self.tables.write().await;

        let Some(pet) = tables.pets.get_mut(&id) else {
            return Ok(None);
        };
        pet.name = changes.name;
        pet.kind = changes.kind;
        pet.age = changes.age;
        pet.breed = changes.breed;

        let pet = pet.clone();
        Ok(Some(tables.with_images(&pet)))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;

        if tables.pets.remove(&id).is_none() {
            return Ok(false);
        }
        tables.images.retain(|_, img| img.pet_id != id);
        Ok(true)
    }

    async fn add_images(&self, id: i64, urls: Vec<String>) -> Result<Option<usize>> {
        let mut tables = self.tables.write().await;

        if !tables.pets.contains_key(&id) {
            return Ok(None);
        }

        let mut inserted = 0;
        for url in urls {
            let duplicate = tables
                .images
                .values()
                .any(|img| img.pet_id == id && img.url == url);
            if !duplicate {
                tables.insert_image(id, url);
                inserted += 1;
            }
        }
        Ok(Some(inserted))
    }
}

// == Users ==
#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// User repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.table.read().await;
        Ok(table.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let mut table = self.table.write().await;

        // email is unique
        if table.users.values().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest("Email already exists".to_string()));
        }

        table.last_id += 1;
        let record = User {
            id: table.last_id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        table.users.insert(record.id, record.clone());
        Ok(record)
    }
}

//! Pet operations
//!
//! List reads go through [`PetListCache`]; detail reads never do. Each
//! successful mutation invalidates the list namespace before returning.

use std::sync::Arc;

use tracing::info;

use super::listing::{Lookup, PetListCache};
use super::stats::StatsSnapshot;
use crate::cache::CacheBackend;
use crate::db::PetRepository;
use crate::error::{AppError, Result};
use crate::models::{Pet, PetFilters, PetRequest};

/// Where a list result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "HIT",
            CacheOutcome::Miss => "MISS",
        }
    }
}

/// A pet list together with its cache outcome.
#[derive(Debug)]
pub struct Listing {
    pub pets: Vec<Pet>,
    pub outcome: CacheOutcome,
}

fn pet_not_found() -> AppError {
    AppError::NotFound("Pet not found".to_string())
}

/// Pet CRUD with cache-aside listing.
pub struct PetService {
    repo: Arc<dyn PetRepository>,
    listing: PetListCache,
}

impl PetService {
    pub fn new(repo: Arc<dyn PetRepository>, cache: Arc<dyn CacheBackend>, ttl_seconds: u64) -> Self {
        Self {
            repo,
            listing: PetListCache::new(cache, ttl_seconds),
        }
    }

    // == List ==
    /// Returns pets matching `filters`, from cache when possible.
    pub async fn list(&self, filters: &PetFilters) -> Result<Listing> {
        let key = match self.listing.lookup(filters).await? {
            Lookup::Hit(pets) => {
                return Ok(Listing {
                    pets,
                    outcome: CacheOutcome::Hit,
                })
            }
            Lookup::Miss { key } => key,
        };

        let pets = self.repo.find_many(filters).await?;
        self.listing.populate(&key, &pets).await?;

        Ok(Listing {
            pets,
            outcome: CacheOutcome::Miss,
        })
    }

    // == Get ==
    /// Single pet by id, straight from persistence.
    pub async fn get(&self, id: i64) -> Result<Pet> {
        self.repo.find_by_id(id).await?.ok_or_else(pet_not_found)
    }

    // == Create ==
    pub async fn create(&self, request: PetRequest) -> Result<Pet> {
        let pet = self.repo.create(request.into_new_pet()).await?;
        info!(pet_id = pet.id, name = %pet.name, "pet created");

        self.listing.invalidate().await?;
        Ok(pet)
    }

    // == Update ==
    /// Replaces the pet's fields.
    ///
    /// Invalidates the list namespace like every other mutation. Earlier
    /// revisions of this API skipped it here and served stale lists.
    pub async fn update(&self, id: i64, request: PetRequest) -> Result<Pet> {
        let pet = self
            .repo
            .update(id, request.into_changes())
            .await?
            .ok_or_else(pet_not_found)?;
        info!(pet_id = id, "pet updated");

        self.listing.invalidate().await?;
        Ok(pet)
    }

    // == Delete ==
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(pet_not_found());
        }
        info!(pet_id = id, "pet deleted");

        self.listing.invalidate().await?;
        Ok(())
    }

    // == Attach Images ==
    /// Records uploaded images against a pet. Returns the number inserted.
    pub async fn attach_images(&self, id: i64, urls: Vec<String>) -> Result<usize> {
        let inserted = self
            .repo
            .add_images(id, urls)
            .await?
            .ok_or_else(pet_not_found)?;
        info!(pet_id = id, inserted, "pet images attached");

        self.listing.invalidate().await?;
        Ok(inserted)
    }

    /// Pet-existence check used before accepting an upload.
    pub async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.repo.find_by_id(id).await?.is_some())
    }

    pub fn cache_stats(&self) -> StatsSnapshot {
        self.listing.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::db::InMemoryPetRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::{NewPet, PetChanges};

    /// Repository wrapper counting list queries.
    struct CountingRepo {
        inner: InMemoryPetRepository,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl PetRepository for CountingRepo {
        async fn find_many(&self, filters: &PetFilters) -> Result<Vec<Pet>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_many(filters).await
        }
        async fn find_by_id(&self, id: i64) -> Result<Option<Pet>> {
            self.inner.find_by_id(id).await
        }
        async fn create(&self, pet: NewPet) -> Result<Pet> {
            self.inner.create(pet).await
        }
        async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>> {
            self.inner.update(id, changes).await
        }
        async fn delete(&self, id: i64) -> Result<bool> {
            self.inner.delete(id).await
        }
        async fn add_images(&self, id: i64, urls: Vec<String>) -> Result<Option<usize>> {
            self.inner.add_images(id, urls).await
        }
    }

    fn setup() -> (PetService, Arc<CountingRepo>) {
        let repo = Arc::new(CountingRepo {
            inner: InMemoryPetRepository::new(),
            queries: AtomicUsize::new(0),
        });
        let service = PetService::new(repo.clone(), Arc::new(MemoryCache::new()), 3600);
        (service, repo)
    }

    fn request(name: &str, kind: &str, age: i64, breed: &str) -> PetRequest {
        PetRequest {
            name: name.to_string(),
            kind: kind.to_string(),
            age,
            breed: breed.to_string(),
            images: Vec::new(),
        }
    }

    fn queries(repo: &CountingRepo) -> usize {
        repo.queries.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_second_list_is_served_from_cache() {
        let (service, repo) = setup();
        service.create(request("Buddy", "Dog", 2, "Beagle")).await.unwrap();

        let first = service.list(&PetFilters::default()).await.unwrap();
        let second = service.list(&PetFilters::default()).await.unwrap();

        assert_eq!(first.outcome, CacheOutcome::Miss);
        assert_eq!(second.outcome, CacheOutcome::Hit);
        assert_eq!(first.pets, second.pets);
        assert_eq!(queries(&repo), 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_unrelated_filters() {
        let (service, repo) = setup();
        let cats = PetFilters {
            kind: Some("Cat".to_string()),
            ..Default::default()
        };

        service.list(&cats).await.unwrap();
        service.list(&PetFilters::default()).await.unwrap();
        assert_eq!(queries(&repo), 2);

        // a dog cannot appear in the cat list, but the cat list is dropped anyway
        service.create(request("Rex", "Dog", 4, "Lab")).await.unwrap();

        assert_eq!(service.list(&cats).await.unwrap().outcome, CacheOutcome::Miss);
        assert_eq!(
            service.list(&PetFilters::default()).await.unwrap().outcome,
            CacheOutcome::Miss
        );
        assert_eq!(queries(&repo), 4);
    }

    #[tokio::test]
    async fn test_update_invalidates() {
        let (service, _repo) = setup();
        let pet = service.create(request("Tiger", "Cat", 3, "Siamese")).await.unwrap();

        service.list(&PetFilters::default()).await.unwrap();
        service
            .update(pet.id, request("Tiger", "Cat", 4, "Siamese"))
            .await
            .unwrap();

        let listing = service.list(&PetFilters::default()).await.unwrap();
        assert_eq!(listing.outcome, CacheOutcome::Miss);
        assert_eq!(listing.pets[0].age, 4);
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_404s_when_absent() {
        let (service, _repo) = setup();
        let pet = service.create(request("Tiger", "Cat", 3, "Siamese")).await.unwrap();
        service.list(&PetFilters::default()).await.unwrap();

        service.delete(pet.id).await.unwrap();
        let listing = service.list(&PetFilters::default()).await.unwrap();
        assert_eq!(listing.outcome, CacheOutcome::Miss);
        assert!(listing.pets.is_empty());

        assert!(matches!(
            service.delete(pet.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_attach_images_invalidates() {
        let (service, _repo) = setup();
        let pet = service.create(request("Tiger", "Cat", 3, "Siamese")).await.unwrap();
        service.list(&PetFilters::default()).await.unwrap();

        let inserted = service
            .attach_images(pet.id, vec!["tiger.png".to_string()])
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let listing = service.list(&PetFilters::default()).await.unwrap();
        assert_eq!(listing.outcome, CacheOutcome::Miss);
        assert_eq!(listing.pets[0].images.len(), 1);
    }

    #[tokio::test]
    async fn test_get_never_touches_cache() {
        let (service, _repo) = setup();
        let pet = service.create(request("Tiger", "Cat", 3, "Siamese")).await.unwrap();

        service.get(pet.id).await.unwrap();
        service.get(pet.id).await.unwrap();

        let stats = service.cache_stats();
        assert_eq!(stats.hits + stats.misses, 0);
        assert!(matches!(service.get(999).await, Err(AppError::NotFound(_))));
    }
}

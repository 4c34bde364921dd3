//! API Handlers
//!
//! HTTP request handlers for the pet endpoints, cache stats and health.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, rejection::QueryRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::extract::{AdminOnly, Authenticated, ValidatedJson};
use super::rate_limit::RateLimiter;
use crate::auth::{Argon2Hasher, AuthService, TokenService};
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::db::{InMemoryPetRepository, InMemoryUserRepository, PetRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{
    HealthResponse, MessageResponse, Pet, PetFilters, PetRequest, StatsResponse, UploadResponse,
};
use crate::pets::PetService;
use crate::uploads::{UploadStore, MAX_FILES_PER_UPLOAD};

/// Response header reporting whether a list came from cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Multipart field carrying pet images
const IMAGES_FIELD: &str = "images";

/// Application state shared across all handlers.
///
/// Every collaborator is built once at start-up and injected here.
#[derive(Clone)]
pub struct AppState {
    pub pets: Arc<PetService>,
    pub auth: Arc<AuthService>,
    pub uploads: UploadStore,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates a new AppState over the given collaborators.
    pub fn new(
        pets: Arc<dyn PetRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheBackend>,
        config: &Config,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_hours);

        Self {
            pets: Arc::new(PetService::new(pets, cache, config.cache_ttl)),
            auth: Arc::new(AuthService::new(users, Arc::new(Argon2Hasher), tokens)),
            uploads: UploadStore::new(config.upload_dir.clone()),
            rate_limiter: Arc::new(RateLimiter::from_config(config)),
        }
    }

    /// Creates an AppState with in-memory persistence over `cache`.
    pub fn in_memory(cache: Arc<dyn CacheBackend>, config: &Config) -> Self {
        Self::new(
            Arc::new(InMemoryPetRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            cache,
            config,
        )
    }
}

fn pet_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::BadRequest("Invalid pet id".to_string()))
}

/// Handler for GET /api/pets
///
/// Cache-aside list read. The `x-cache` header says whether persistence
/// was consulted.
pub async fn list_pets(
    State(state): State<AppState>,
    query: std::result::Result<Query<PetFilters>, QueryRejection>,
) -> Result<Response> {
    let Query(filters) = query?;
    let listing = state.pets.list(&filters).await?;

    Ok((
        [(CACHE_STATUS_HEADER, listing.outcome.as_str())],
        Json(listing.pets),
    )
        .into_response())
}

/// Handler for GET /api/pets/:id
///
/// Always read from persistence.
pub async fn get_pet(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Pet>> {
    let id = pet_id(path)?;
    Ok(Json(state.pets.get(id).await?))
}

/// Handler for POST /api/pets
pub async fn create_pet(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    ValidatedJson(request): ValidatedJson<PetRequest>,
) -> Result<(StatusCode, Json<Pet>)> {
    debug!(user_id = user.user_id, "creating pet");
    let pet = state.pets.create(request).await?;

    Ok((StatusCode::CREATED, Json(pet)))
}

/// Handler for PUT and PATCH /api/pets/:id
///
/// Both verbs take the full pet body.
pub async fn update_pet(
    State(state): State<AppState>,
    Authenticated(_user): Authenticated,
    path: std::result::Result<Path<i64>, PathRejection>,
    ValidatedJson(request): ValidatedJson<PetRequest>,
) -> Result<Json<Pet>> {
    let id = pet_id(path)?;
    Ok(Json(state.pets.update(id, request).await?))
}

/// Handler for DELETE /api/pets/:id (admin only)
pub async fn delete_pet(
    State(state): State<AppState>,
    AdminOnly(_admin): AdminOnly,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let id = pet_id(path)?;
    state.pets.delete(id).await?;

    Ok(Json(MessageResponse::new("Pet deleted successfully")))
}

/// Handler for POST /api/pets/:id/upload (admin only)
///
/// Accepts up to five files in the `images` field. Files without a png,
/// jpg or jpeg extension are skipped. Nothing is written to disk until the
/// whole request has been read and accepted.
pub async fn upload_images(
    State(state): State<AppState>,
    AdminOnly(_admin): AdminOnly,
    path: std::result::Result<Path<i64>, PathRejection>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let id = pet_id(path)?;
    if !state.pets.exists(id).await? {
        return Err(AppError::NotFound("Pet not found".to_string()));
    }

    let mut received = 0usize;
    let mut files: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        received += 1;
        if received > MAX_FILES_PER_UPLOAD {
            return Err(AppError::BadRequest(format!(
                "At most {} files per upload",
                MAX_FILES_PER_UPLOAD
            )));
        }

        if !UploadStore::accepts(&file_name) {
            debug!(file = %file_name, "skipping upload with disallowed extension");
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file '{}': {}", file_name, e)))?;
        files.push((file_name, bytes));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()));
    }

    let stored = state.uploads.save_all(&files).await?;

    match state.pets.attach_images(id, stored.clone()).await {
        Ok(uploaded) => Ok((StatusCode::CREATED, Json(UploadResponse::new(uploaded)))),
        Err(err) => {
            // pet deleted mid-request: nothing references the files
            if matches!(err, AppError::NotFound(_)) {
                state.uploads.remove(&stored).await;
            }
            Err(err)
        }
    }
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.pets.cache_stats();

    Json(StatsResponse {
        hits: stats.hits,
        misses: stats.misses,
        invalidations: stats.invalidations,
        hit_rate: stats.hit_rate(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! API Routes
//!
//! Configures the Axum router with all pet store endpoints.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::auth::{login_handler, register_handler};
use super::handlers::{
    create_pet, delete_pet, get_pet, health_handler, list_pets, stats_handler, update_pet,
    upload_images, AppState,
};
use super::rate_limit::rate_limit;

/// Request body ceiling; sized for five image uploads
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/auth/register`, `POST /api/auth/login`
/// - `GET /api/pets` (cached), `POST /api/pets`
/// - `GET|PUT|PATCH|DELETE /api/pets/:id`
/// - `POST /api/pets/:id/upload`
/// - `GET /api/cache/stats`, `GET /health`
/// - `/uploads/*` static image files
///
/// # Middleware
/// - Rate limit: fixed window per client IP, 429 once exhausted
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route(
            "/api/pets/:id",
            get(get_pet)
                .put(update_pet)
                .patch(update_pet)
                .delete(delete_pet),
        )
        .route("/api/pets/:id/upload", post(upload_images))
        .route("/api/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .nest_service("/uploads", uploads)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Pet Store - REST backend for a pet-store application
//!
//! Binary entry point: wires configuration, the cache backend and the
//! router together and serves until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pet_store::api::{create_router, AppState};
use pet_store::cache::{CacheBackend, MemoryCache, RedisCache};
use pet_store::config::Config;
use pet_store::tasks::spawn_cleanup_task;

/// Main entry point for the pet store server.
///
/// # Startup Sequence
/// 1. Load `.env` and initialize tracing
/// 2. Load configuration from environment variables
/// 3. Connect the cache backend (Redis, or in-memory with a sweep task)
/// 4. Build services and the Axum router
/// 5. Serve on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pet_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pet Store server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, token_ttl={}h, upload_dir={}",
        config.server_port,
        config.cache_ttl,
        config.token_ttl_hours,
        config.upload_dir.display()
    );

    let (cache, cleanup_handle): (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) =
        match &config.redis_url {
            Some(url) => {
                let redis = RedisCache::connect(url)
                    .await
                    .context("Failed to initialize Redis cache")?;
                info!("Cache backend: redis");
                (Arc::new(redis), None)
            }
            None => {
                let memory = MemoryCache::new();
                let handle = spawn_cleanup_task(memory.store(), config.cleanup_interval);
                info!("Cache backend: in-memory");
                (Arc::new(memory), Some(handle))
            }
        };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    let state = AppState::in_memory(cache, &config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}

//! Redis cache backend

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::cache::CacheBackend;
use crate::error::{AppError, Result};

/// Keys examined per SCAN round trip during prefix deletion
const SCAN_BATCH: usize = 100;

/// [`CacheBackend`] over a shared Redis connection.
///
/// Per-key atomicity comes from Redis itself; SET and DEL are single
/// commands. Errors are returned as [`AppError::Cache`] and never masked.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();

        conn.get(key)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to get key '{}': {}", key, e)))
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection.clone();

        // EX 0 is rejected by Redis
        let ttl = ttl_seconds.max(1);

        let _: () = conn
            .set_ex(key, value, ttl)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}*", escape_glob(prefix));

        let mut cursor = 0u64;
        let mut total_deleted = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    AppError::Cache(format!("Failed to scan prefix '{}': {}", prefix, e))
                })?;

            if !keys.is_empty() {
                let deleted: usize = conn
                    .del(&keys)
                    .await
                    .map_err(|e| AppError::Cache(format!("Failed to delete keys: {}", e)))?;
                total_deleted += deleted;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }
}

/// Escapes Redis glob metacharacters so the prefix matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

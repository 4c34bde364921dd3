//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_TTL_SECS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// HMAC secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: u64,
    /// TTL in seconds for cached pet lists
    pub cache_ttl: u64,
    /// In-memory cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Redis connection URL; the in-memory cache is used when absent
    pub redis_url: Option<String>,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Requests allowed per client IP in one rate-limit window
    pub rate_limit_max: u64,
    /// Rate-limit window length in seconds
    pub rate_limit_window: u64,
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `JWT_SECRET` - token signing secret (default: "secret")
    /// - `TOKEN_TTL_HOURS` - token lifetime (default: 24)
    /// - `CACHE_TTL` - pet list cache TTL in seconds (default: 3600)
    /// - `CLEANUP_INTERVAL` - cache sweep frequency in seconds (default: 60)
    /// - `REDIS_URL` - Redis URL; otherwise built from `REDIS_HOST`,
    ///   `REDIS_PORT` (6379) and `REDIS_PASSWORD` when `REDIS_HOST` is set
    /// - `UPLOAD_DIR` - image directory (default: "uploads")
    /// - `RATE_LIMIT_MAX` - requests per IP per window (default: 100)
    /// - `RATE_LIMIT_WINDOW` - window length in seconds (default: 900)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed("PORT", defaults.server_port),
            jwt_secret: non_empty("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_hours: parsed("TOKEN_TTL_HOURS", defaults.token_ttl_hours),
            cache_ttl: parsed("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: parsed("CLEANUP_INTERVAL", defaults.cleanup_interval),
            redis_url: non_empty("REDIS_URL").or_else(|| {
                non_empty("REDIS_HOST").map(|host| {
                    redis_url(&host, parsed("REDIS_PORT", 6379), non_empty("REDIS_PASSWORD"))
                })
            }),
            upload_dir: non_empty("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            rate_limit_max: parsed("RATE_LIMIT_MAX", defaults.rate_limit_max),
            rate_limit_window: parsed("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
        }
    }
}

fn redis_url(host: &str, port: u16, password: Option<String>) -> String {
    match password {
        Some(password) => format!(
            "redis://:{}@{}:{}",
            urlencoding::encode(&password),
            host,
            port
        ),
        None => format!("redis://{}:{}", host, port),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 24,
            cache_ttl: DEFAULT_TTL_SECS,
            cleanup_interval: 60,
            redis_url: None,
            upload_dir: PathBuf::from("uploads"),
            rate_limit_max: 100,
            rate_limit_window: 15 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.jwt_secret, "secret");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.cleanup_interval, 60);
        assert!(config.redis_url.is_none());
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window, 900);
    }

    #[test]
    fn test_redis_url_composition() {
        assert_eq!(redis_url("127.0.0.1", 6379, None), "redis://127.0.0.1:6379");
        assert_eq!(
            redis_url("cache", 6380, Some("pw".to_string())),
            "redis://:pw@cache:6380"
        );
    }

    #[test]
    fn test_redis_password_is_percent_encoded() {
        let url = redis_url("cache", 6379, Some("p@ss:w/rd".to_string()));
        assert_eq!(url, "redis://:p%40ss%3Aw%2Frd@cache:6379");

        let info = redis::Client::open(url.as_str()).unwrap().get_connection_info().clone();
        assert_eq!(info.redis.password.as_deref(), Some("p@ss:w/rd"));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "PORT",
            "JWT_SECRET",
            "TOKEN_TTL_HOURS",
            "CACHE_TTL",
            "CLEANUP_INTERVAL",
            "REDIS_URL",
            "REDIS_HOST",
            "UPLOAD_DIR",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.cache_ttl, 3600);
        assert!(config.redis_url.is_none());
    }
}

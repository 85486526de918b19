//! Storage backends implementing [`UrlRepository`].
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - PostgreSQL with SQLx and embedded migrations
//! - [`RedisUrlRepository`] - JSON documents in Redis
//! - [`MemoryUrlRepository`] - in-process maps for development and tests
//!
//! [`connect`] picks the backend named by [`Config::storage_backend`] and
//! retries the initial connection with exponential backoff.

pub mod memory_url_repository;
pub mod pg_url_repository;
pub mod redis_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
pub use redis_url_repository::RedisUrlRepository;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::UrlRepository;

/// Connects to the configured storage backend.
///
/// Up to [`Config::storage_connect_retries`] attempts are made, with jittered
/// exponential backoff capped at five seconds between them.
///
/// # Errors
///
/// Returns an error if the backend is missing its connection URL or every
/// attempt fails.
pub async fn connect(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    let strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.storage_connect_retries.saturating_sub(1));

    let repository: Arc<dyn UrlRepository> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let repo = Retry::start(strategy, move || async move {
                PgUrlRepository::connect(url, config).await.inspect_err(|e| {
                    warn!(error = %e, "PostgreSQL connection attempt failed");
                })
            })
            .await
            .context("Failed to connect to PostgreSQL")?;
            Arc::new(repo)
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis backend")?;
            let repo = Retry::start(strategy, move || async move {
                RedisUrlRepository::connect(url).await.inspect_err(|e| {
                    warn!(error = %e, "Redis connection attempt failed");
                })
            })
            .await
            .context("Failed to connect to Redis")?;
            Arc::new(repo)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will be lost on restart");
            Arc::new(MemoryUrlRepository::new())
        }
    };

    info!(backend = %config.storage_backend, "Storage ready");
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            ..Config::default()
        };

        let repository = connect(&config).await.unwrap();
        assert!(repository.health_check().await);
    }

    #[tokio::test]
    async fn test_connect_requires_backend_url() {
        let config = Config {
            storage_backend: StorageBackend::Redis,
            redis_url: None,
            ..Config::default()
        };

        let err = connect(&config).await.err().unwrap();
        assert!(err.to_string().contains("REDIS_URL"));
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_retries() {
        let config = Config {
            storage_backend: StorageBackend::Redis,
            redis_url: Some("not-a-redis-url".to_string()),
            storage_connect_retries: 2,
            ..Config::default()
        };

        let err = connect(&config).await.err().unwrap();
        assert_eq!(err.to_string(), "Failed to connect to Redis");
    }
}

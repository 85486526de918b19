//! Repository trait for short URL and click persistence.

use crate::domain::entities::{Click, NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage port for short URL records and click events.
///
/// Every backend must behave identically from the caller's point of view; the
/// engines never depend on backend-specific behavior.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisUrlRepository`] - Redis documents
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process maps
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Any backend failure is reported as [`AppError::StorageUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new short URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `short` or `alias` already exists. The
    /// check is atomic at the storage layer, so it holds under concurrent
    /// creation even when the caller's pre-checks raced.
    async fn create_url(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a record by its exact short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortUrl))` if found, regardless of `active` or `expires`
    /// - `Ok(None)` if not found
    async fn find_url_for_redirect(&self, short: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Returns whether any record uses `short` as its code.
    async fn short_code_exists(&self, short: &str) -> Result<bool, AppError>;

    /// Returns whether any record was created with `alias`.
    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError>;

    /// Appends a click event for the record with id `url_id`.
    async fn record_click(&self, url_id: i64) -> Result<Click, AppError>;

    /// Counts all stored short URLs.
    async fn shorten_count(&self) -> Result<i64, AppError>;

    /// Counts all recorded clicks.
    async fn click_count(&self) -> Result<i64, AppError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Releases backend connections. Called once at shutdown.
    async fn close(&self) {}
}

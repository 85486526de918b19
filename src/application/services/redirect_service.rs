//! Short code resolution and click recording service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Service resolving short codes to their destination.
///
/// Resolution enforces the activation and expiration policy. Click recording
/// is best-effort: failures are logged and never reach the caller.
pub struct RedirectService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves a short code to its record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortUrl))` if the code exists, is active and has not expired
    /// - `Ok(None)` if no record uses the code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Gone`] if the record was deactivated or its expiry
    /// is at or before the current instant.
    /// Returns [`AppError::StorageUnavailable`] on storage failures.
    pub async fn resolve_short_code(&self, short: &str) -> Result<Option<ShortUrl>, AppError> {
        self.resolve_short_code_at(short, Utc::now()).await
    }

    /// Same as [`Self::resolve_short_code`] with an explicit notion of "now".
    pub async fn resolve_short_code_at(
        &self,
        short: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError> {
        let Some(record) = self.repository.find_url_for_redirect(short).await? else {
            debug!(short, "Short code not found");
            return Ok(None);
        };

        if !record.active {
            return Err(AppError::gone(
                "This short URL has been deactivated",
                json!({ "short": short }),
            ));
        }

        if record.is_expired_at(now) {
            return Err(AppError::gone(
                "This short URL has expired",
                json!({ "short": short, "expires": record.expires }),
            ));
        }

        metrics::counter!("reductio_redirects_total").increment(1);
        Ok(Some(record))
    }

    /// Records a click for `url_id`, absorbing any failure.
    ///
    /// Storage errors are logged and counted, never returned.
    pub async fn record_click(&self, url_id: i64) {
        match self.repository.record_click(url_id).await {
            Ok(click) => debug!(url_id, click_id = click.id, "Click recorded"),
            Err(e) => {
                metrics::counter!("reductio_click_record_failures_total").increment(1);
                error!(url_id, error = %e, "Failed to record click");
            }
        }
    }
}

impl<R: UrlRepository + ?Sized + 'static> RedirectService<R> {
    /// Dispatches [`Self::record_click`] as a detached task.
    ///
    /// The caller is not expected to await the handle; it is returned so tests
    /// and shutdown code can wait for completion.
    pub fn spawn_click_recording(self: &Arc<Self>, url_id: i64) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.record_click(url_id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Click, NewShortUrl};
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Duration;

    fn record(active: bool, expires: Option<DateTime<Utc>>) -> ShortUrl {
        let mut record = NewShortUrl {
            short: "abc1234".to_string(),
            original: "https://example.com".to_string(),
            alias: None,
            expires,
        }
        .into_record(42, Utc::now() - Duration::days(1));
        record.active = active;
        record
    }

    fn service_returning(found: Option<ShortUrl>) -> RedirectService<MockUrlRepository> {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_url_for_redirect()
            .withf(|short| short == "abc1234")
            .times(1)
            .returning(move |_| Ok(found.clone()));
        RedirectService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_resolve_active_record() {
        let service = service_returning(Some(record(true, None)));

        let resolved = service.resolve_short_code("abc1234").await.unwrap();

        let resolved = resolved.expect("record should resolve");
        assert_eq!(resolved.id, 42);
        assert_eq!(resolved.original, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_absent_returns_none() {
        let service = service_returning(None);

        let resolved = service.resolve_short_code("abc1234").await.unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_resolve_inactive_is_gone() {
        let future = Utc::now() + Duration::days(30);
        let service = service_returning(Some(record(false, Some(future))));

        let err = service.resolve_short_code("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::Gone { .. }));
        assert!(err.to_string().contains("deactivated"));
    }

    #[tokio::test]
    async fn test_resolve_expired_is_gone() {
        let past = Utc::now() - Duration::minutes(5);
        let service = service_returning(Some(record(true, Some(past))));

        let err = service.resolve_short_code("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::Gone { .. }));
        assert!(err.to_string().contains("expired"));
    }

    #[tokio::test]
    async fn test_resolve_expiring_now_is_gone() {
        let now = Utc::now();
        let service = service_returning(Some(record(true, Some(now))));

        let err = service
            .resolve_short_code_at("abc1234", now)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_resolve_not_yet_expired() {
        let now = Utc::now();
        let service = service_returning(Some(record(true, Some(now + Duration::seconds(1)))));

        let resolved = service.resolve_short_code_at("abc1234", now).await.unwrap();

        assert!(resolved.is_some());
    }

    #[tokio::test]
    async fn test_resolve_storage_failure_propagates() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_url_for_redirect()
            .returning(|_| Err(AppError::storage_unavailable("Storage unavailable", json!({}))));
        let service = RedirectService::new(Arc::new(repo));

        let err = service.resolve_short_code("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_record_click_success() {
        let mut repo = MockUrlRepository::new();
        repo.expect_record_click()
            .withf(|url_id| *url_id == 42)
            .times(1)
            .returning(|url_id| Ok(Click::new(1, url_id, Utc::now())));
        let service = RedirectService::new(Arc::new(repo));

        service.record_click(42).await;
    }

    #[tokio::test]
    async fn test_record_click_failure_is_absorbed() {
        let mut repo = MockUrlRepository::new();
        repo.expect_record_click()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("Storage unavailable", json!({}))));
        let service = RedirectService::new(Arc::new(repo));

        service.record_click(42).await;
    }

    #[tokio::test]
    async fn test_spawned_click_failure_does_not_affect_resolution() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_url_for_redirect()
            .returning(|_| Ok(Some(record(true, None))));
        repo.expect_record_click()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("Storage unavailable", json!({}))));
        let service = Arc::new(RedirectService::new(Arc::new(repo)));

        let resolved = service.resolve_short_code("abc1234").await.unwrap().unwrap();
        let handle = service.spawn_click_recording(resolved.id);

        assert_eq!(resolved.original, "https://example.com");
        assert!(handle.await.is_ok());
    }
}

//! Aggregate statistics service.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Total counts of stored URLs and recorded clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_urls: i64,
    pub total_clicks: i64,
}

/// Service reporting aggregate counts.
pub struct StatsService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns total URL and click counts.
    ///
    /// Both counts run concurrently. There is no partial result: if either
    /// count fails the whole call fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on storage failures.
    pub async fn get_stats(&self) -> Result<Stats, AppError> {
        let (total_urls, total_clicks) = tokio::try_join!(
            self.repository.shorten_count(),
            self.repository.click_count()
        )?;

        Ok(Stats {
            total_urls,
            total_clicks,
        })
    }
}

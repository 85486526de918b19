//! In-process implementation of the URL repository.
//!
//! Used for local development and tests. Nothing survives a restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{Click, NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    urls: HashMap<String, ShortUrl>,
    aliases: HashSet<String>,
    clicks: Vec<Click>,
    next_url_id: i64,
    next_click_id: i64,
}

/// Repository backed by maps behind a single async lock.
///
/// Uniqueness checks and inserts happen under the same write guard, so
/// concurrent creations of the same code cannot both succeed.
#[derive(Default)]
pub struct MemoryUrlRepository {
    inner: RwLock<Inner>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the clicks recorded for `url_id` in insertion order.
    pub async fn clicks_for(&self, url_id: i64) -> Vec<Click> {
        let inner = self.inner.read().await;
        inner
            .clicks
            .iter()
            .filter(|c| c.url_id == url_id)
            .cloned()
            .collect()
    }

    /// Flips the `active` flag of a stored record.
    ///
    /// Returns `false` if no record uses `short`.
    pub async fn set_active(&self, short: &str, active: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.urls.get_mut(short) {
            Some(record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create_url(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut inner = self.inner.write().await;

        let alias_taken = new_url
            .alias
            .as_ref()
            .is_some_and(|a| inner.aliases.contains(a));
        if alias_taken || inner.urls.contains_key(&new_url.short) {
            return Err(AppError::conflict(
                "Short code or alias already exists",
                json!({ "short": new_url.short }),
            ));
        }

        inner.next_url_id += 1;
        let record = new_url.into_record(inner.next_url_id, Utc::now());

        if let Some(alias) = &record.alias {
            inner.aliases.insert(alias.clone());
        }
        inner.urls.insert(record.short.clone(), record.clone());

        Ok(record)
    }

    async fn find_url_for_redirect(&self, short: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self.inner.read().await.urls.get(short).cloned())
    }

    async fn short_code_exists(&self, short: &str) -> Result<bool, AppError> {
        Ok(self.inner.read().await.urls.contains_key(short))
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        Ok(self.inner.read().await.aliases.contains(alias))
    }

    async fn record_click(&self, url_id: i64) -> Result<Click, AppError> {
        let mut inner = self.inner.write().await;

        inner.next_click_id += 1;
        let click = Click::new(inner.next_click_id, url_id, Utc::now());
        inner.clicks.push(click.clone());

        Ok(click)
    }

    async fn shorten_count(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.urls.len() as i64)
    }

    async fn click_count(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.clicks.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_url(short: &str, alias: Option<&str>) -> NewShortUrl {
        NewShortUrl {
            short: short.to_string(),
            original: "https://example.com".to_string(),
            alias: alias.map(str::to_string),
            expires: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = MemoryUrlRepository::new();

        let first = repo.create_url(new_url("aaaa111", None)).await.unwrap();
        let second = repo.create_url(new_url("bbbb222", None)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_set_active() {
        let repo = MemoryUrlRepository::new();
        repo.create_url(new_url("aaaa111", None)).await.unwrap();

        assert!(repo.set_active("aaaa111", false).await);
        assert!(!repo.set_active("missing", false).await);

        let record = repo.find_url_for_redirect("aaaa111").await.unwrap().unwrap();
        assert!(!record.active);
    }

    #[tokio::test]
    async fn test_concurrent_create_same_code() {
        let repo = std::sync::Arc::new(MemoryUrlRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create_url(new_url("same123", None)).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(repo.shorten_count().await.unwrap(), 1);
    }
}

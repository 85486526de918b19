#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use url_reductio::config::{Config, StorageBackend};
use url_reductio::domain::entities::{Click, NewShortUrl, ShortUrl};
use url_reductio::domain::repositories::UrlRepository;
use url_reductio::error::AppError;
use url_reductio::infrastructure::persistence::MemoryUrlRepository;
use url_reductio::state::AppState;

pub const BASE_URL: &str = "https://reduct.io";

pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        storage_backend: StorageBackend::Memory,
        environment: "test".to_string(),
        ..Config::default()
    }
}

pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repo = Arc::new(MemoryUrlRepository::new());
    let state = AppState::new(&test_config(), repo.clone());
    (state, repo)
}

pub fn create_state_with(repo: Arc<dyn UrlRepository>) -> AppState {
    AppState::new(&test_config(), repo)
}

pub async fn create_test_link(
    repo: &dyn UrlRepository,
    short: &str,
    original: &str,
    expires: Option<DateTime<Utc>>,
) -> ShortUrl {
    repo.create_url(NewShortUrl {
        short: short.to_string(),
        original: original.to_string(),
        alias: Some(short.to_string()),
        expires,
    })
    .await
    .unwrap()
}

/// Polls until `url_id` has `expected` clicks or the deadline passes.
pub async fn wait_for_clicks(repo: &MemoryUrlRepository, url_id: i64, expected: usize) -> usize {
    for _ in 0..100 {
        let count = repo.clicks_for(url_id).await.len();
        if count >= expected {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    repo.clicks_for(url_id).await.len()
}

fn storage_down() -> AppError {
    AppError::storage_unavailable("Storage unavailable", json!({}))
}

/// Memory store whose click writes always fail.
pub struct FailingClickRepository {
    pub inner: MemoryUrlRepository,
}

#[async_trait]
impl UrlRepository for FailingClickRepository {
    async fn create_url(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        self.inner.create_url(new_url).await
    }

    async fn find_url_for_redirect(&self, short: &str) -> Result<Option<ShortUrl>, AppError> {
        self.inner.find_url_for_redirect(short).await
    }

    async fn short_code_exists(&self, short: &str) -> Result<bool, AppError> {
        self.inner.short_code_exists(short).await
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        self.inner.alias_exists(alias).await
    }

    async fn record_click(&self, _url_id: i64) -> Result<Click, AppError> {
        Err(storage_down())
    }

    async fn shorten_count(&self) -> Result<i64, AppError> {
        self.inner.shorten_count().await
    }

    async fn click_count(&self) -> Result<i64, AppError> {
        self.inner.click_count().await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Store where every operation fails.
pub struct UnreachableRepository;

#[async_trait]
impl UrlRepository for UnreachableRepository {
    async fn create_url(&self, _new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        Err(storage_down())
    }

    async fn find_url_for_redirect(&self, _short: &str) -> Result<Option<ShortUrl>, AppError> {
        Err(storage_down())
    }

    async fn short_code_exists(&self, _short: &str) -> Result<bool, AppError> {
        Err(storage_down())
    }

    async fn alias_exists(&self, _alias: &str) -> Result<bool, AppError> {
        Err(storage_down())
    }

    async fn record_click(&self, _url_id: i64) -> Result<Click, AppError> {
        Err(storage_down())
    }

    async fn shorten_count(&self) -> Result<i64, AppError> {
        Err(storage_down())
    }

    async fn click_count(&self) -> Result<i64, AppError> {
        Err(storage_down())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Inserts a fixed peer address so per-IP rate limiting can key requests.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut()
            .insert(axum::extract::ConnectInfo(addr));
        self.inner.call(req)
    }
}

//! PostgreSQL implementation of the URL repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Config;
use crate::domain::entities::{Click, NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    short: String,
    original: String,
    alias: Option<String>,
    created: DateTime<Utc>,
    expires: Option<DateTime<Utc>>,
    active: bool,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        Self {
            id: row.id,
            short: row.short,
            original: row.original,
            alias: row.alias,
            created: row.created,
            expires: row.expires,
            active: row.active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    url_id: i64,
    timestamp: DateTime<Utc>,
}

/// PostgreSQL repository for short URLs and clicks.
///
/// Uniqueness of `short` and `alias` is enforced by table constraints, so a
/// racing insert surfaces as [`AppError::Conflict`].
#[derive(Clone)]
pub struct PgUrlRepository {
    pool: PgPool,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool sized from `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the database cannot be
    /// reached or a migration fails.
    pub async fn connect(database_url: &str, config: &Config) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect(database_url)
            .await?;
        info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create_url(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            INSERT INTO short_urls (short, original, alias, expires)
            VALUES ($1, $2, $3, $4)
            RETURNING id, short, original, alias, created, expires, active
            "#,
        )
        .bind(&new_url.short)
        .bind(&new_url.original)
        .bind(&new_url.alias)
        .bind(new_url.expires)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_url_for_redirect(&self, short: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, short, original, alias, created, expires, active
            FROM short_urls
            WHERE short = $1
            "#,
        )
        .bind(short)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn short_code_exists(&self, short: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_urls WHERE short = $1)",
        )
        .bind(short)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_urls WHERE alias = $1)",
        )
        .bind(alias)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn record_click(&self, url_id: i64) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            "INSERT INTO clicks (url_id) VALUES ($1) RETURNING id, url_id, timestamp",
        )
        .bind(url_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Click::new(row.id, row.url_id, row.timestamp))
    }

    async fn shorten_count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_urls")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn click_count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

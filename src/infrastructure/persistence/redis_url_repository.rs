//! Redis implementation of the URL repository.
//!
//! # Key layout
//!
//! | Key | Type | Contents |
//! |-----|------|----------|
//! | `reductio:url:{short}` | string | JSON-encoded [`ShortUrl`] |
//! | `reductio:aliases` | set | every alias ever created |
//! | `reductio:clicks:{url_id}` | list | JSON-encoded [`Click`] events |
//! | `reductio:next_url_id` / `reductio:next_click_id` | string | id sequences |
//! | `reductio:count:urls` / `reductio:count:clicks` | string | running totals |

use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use serde_json::json;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::domain::entities::{Click, NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const KEY_PREFIX: &str = "reductio";

/// Writes a record, its alias and the running total in one server-side step.
///
/// KEYS: url key, alias set, url counter. ARGV: document, alias (empty for none).
/// Replies `1` when stored, `0` when the short code is taken and `-1` when the
/// alias is taken.
static CREATE_URL_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
if ARGV[2] ~= '' and redis.call('SISMEMBER', KEYS[2], ARGV[2]) == 1 then
    return -1
end
redis.call('SET', KEYS[1], ARGV[1])
if ARGV[2] ~= '' then
    redis.call('SADD', KEYS[2], ARGV[2])
end
redis.call('INCR', KEYS[3])
return 1
"#,
    )
});

/// Reply of [`CREATE_URL_SCRIPT`].
#[derive(Debug, PartialEq, Eq)]
enum CreateOutcome {
    Stored,
    ShortTaken,
    AliasTaken,
}

impl CreateOutcome {
    fn from_reply(reply: i64) -> Self {
        match reply {
            1 => Self::Stored,
            -1 => Self::AliasTaken,
            _ => Self::ShortTaken,
        }
    }
}

/// Redis repository storing each record as a JSON document.
///
/// Records are written by a Lua script that checks the short code and alias
/// before storing, so the first writer wins and later writers get
/// [`AppError::Conflict`] without leaving partial state behind.
#[derive(Clone)]
pub struct RedisUrlRepository {
    conn: ConnectionManager,
}

impl RedisUrlRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the URL is invalid, the
    /// connection cannot be established or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self { conn: manager })
    }

    fn url_key(short: &str) -> String {
        format!("{}:url:{}", KEY_PREFIX, short)
    }

    fn clicks_key(url_id: i64) -> String {
        format!("{}:clicks:{}", KEY_PREFIX, url_id)
    }

    fn aliases_key() -> String {
        format!("{}:aliases", KEY_PREFIX)
    }

    fn sequence_key(name: &str) -> String {
        format!("{}:next_{}_id", KEY_PREFIX, name)
    }

    fn counter_key(name: &str) -> String {
        format!("{}:count:{}", KEY_PREFIX, name)
    }

    async fn read_counter(&self, name: &str) -> Result<i64, AppError> {
        let mut conn = self.conn.clone();
        let count: Option<i64> = conn.get(Self::counter_key(name)).await?;
        Ok(count.unwrap_or(0))
    }
}

#[async_trait]
impl UrlRepository for RedisUrlRepository {
    async fn create_url(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut conn = self.conn.clone();

        // Ids burned by a failed write leave gaps, like a SQL sequence.
        let id: i64 = conn.incr(Self::sequence_key("url"), 1).await?;
        let record = new_url.into_record(id, Utc::now());
        let document = serde_json::to_string(&record)?;

        let reply: i64 = CREATE_URL_SCRIPT
            .key(Self::url_key(&record.short))
            .key(Self::aliases_key())
            .key(Self::counter_key("urls"))
            .arg(document)
            .arg(record.alias.as_deref().unwrap_or(""))
            .invoke_async(&mut conn)
            .await?;

        match CreateOutcome::from_reply(reply) {
            CreateOutcome::Stored => {}
            CreateOutcome::ShortTaken => {
                return Err(AppError::conflict(
                    "Short code or alias already exists",
                    json!({ "short": record.short }),
                ));
            }
            CreateOutcome::AliasTaken => {
                return Err(AppError::conflict(
                    "Short code or alias already exists",
                    json!({ "alias": record.alias }),
                ));
            }
        }

        debug!(short = %record.short, id = record.id, "Stored short URL document");

        Ok(record)
    }

    async fn find_url_for_redirect(&self, short: &str) -> Result<Option<ShortUrl>, AppError> {
        let mut conn = self.conn.clone();
        let document: Option<String> = conn.get(Self::url_key(short)).await?;

        match document {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn short_code_exists(&self, short: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(Self::url_key(short)).await?;
        Ok(exists)
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.sismember(Self::aliases_key(), alias).await?;
        Ok(exists)
    }

    async fn record_click(&self, url_id: i64) -> Result<Click, AppError> {
        let mut conn = self.conn.clone();

        let id: i64 = conn.incr(Self::sequence_key("click"), 1).await?;
        let click = Click::new(id, url_id, Utc::now());
        let document = serde_json::to_string(&click)?;

        let _: () = redis::pipe()
            .atomic()
            .rpush(Self::clicks_key(url_id), document)
            .ignore()
            .incr(Self::counter_key("clicks"), 1)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(click)
    }

    async fn shorten_count(&self) -> Result<i64, AppError> {
        self.read_counter("urls").await
    }

    async fn click_count(&self) -> Result<i64, AppError> {
        self.read_counter("clicks").await
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(RedisUrlRepository::url_key("aB3kP9x"), "reductio:url:aB3kP9x");
        assert_eq!(RedisUrlRepository::clicks_key(42), "reductio:clicks:42");
        assert_eq!(RedisUrlRepository::aliases_key(), "reductio:aliases");
        assert_eq!(
            RedisUrlRepository::sequence_key("url"),
            "reductio:next_url_id"
        );
        assert_eq!(
            RedisUrlRepository::counter_key("clicks"),
            "reductio:count:clicks"
        );
    }

    #[test]
    fn test_create_script_replies() {
        assert_eq!(CreateOutcome::from_reply(1), CreateOutcome::Stored);
        assert_eq!(CreateOutcome::from_reply(0), CreateOutcome::ShortTaken);
        assert_eq!(CreateOutcome::from_reply(-1), CreateOutcome::AliasTaken);
    }
}

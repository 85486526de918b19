//! Short URL entity representing a code-to-destination mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short URL record.
///
/// `short` is the lookup key and shares one namespace between generated codes
/// and user-chosen aliases. When `alias` is set it always equals `short`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub id: i64,
    pub short: String,
    pub original: String,
    pub alias: Option<String>,
    pub created: DateTime<Utc>,
    pub expires: Option<DateTime<Utc>>,
    pub active: bool,
}

impl ShortUrl {
    /// Returns true if the record has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|e| e <= now)
    }
}

/// Input data for creating a new short URL.
///
/// `id`, `created` and `active` are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortUrl {
    pub short: String,
    pub original: String,
    pub alias: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

impl NewShortUrl {
    /// Builds the stored record once storage has assigned the identity fields.
    pub fn into_record(self, id: i64, created: DateTime<Utc>) -> ShortUrl {
        ShortUrl {
            id,
            short: self.short,
            original: self.original,
            alias: self.alias,
            created,
            expires: self.expires,
            active: true,
        }
    }
}

//! Click entity representing a single redirect traversal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A click recorded after a successful resolution.
///
/// `url_id` is a back-reference to [`crate::domain::entities::ShortUrl::id`];
/// clicks are append-only and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub id: i64,
    pub url_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl Click {
    pub fn new(id: i64, url_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            url_id,
            timestamp,
        }
    }
}

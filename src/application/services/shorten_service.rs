//! Short URL creation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Default number of candidate codes drawn before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Pre-validated input for [`ShortenService::shorten_url`].
#[derive(Debug, Clone, Default)]
pub struct ShortenRequest {
    pub original: String,
    pub alias: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

/// A freshly created record together with its public short URL.
#[derive(Debug, Clone)]
pub struct ShortenedUrl {
    pub record: ShortUrl,
    pub short_url: String,
}

/// Service for creating short URLs.
///
/// Chooses the code (alias or generated), retries generated codes on
/// collision, validates the expiry, and persists the record with a single
/// `create_url` call.
pub struct ShortenService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    max_retries: u32,
}

impl<R: UrlRepository + ?Sized> ShortenService<R> {
    /// Creates a new shorten service.
    ///
    /// A trailing `/` on `base_url` is dropped so composed URLs never contain `//`.
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
        max_retries: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator,
            base_url,
            max_retries,
        }
    }

    /// Creates a short URL.
    ///
    /// # Code Selection
    ///
    /// - With an alias: fails if the alias already exists, otherwise uses it as the code
    /// - Without: draws up to `max_retries` independent candidates until one is free
    ///
    /// The alias and code existence checks are best-effort; the storage
    /// uniqueness constraint remains the source of truth and a violation at
    /// creation time is reported as [`AppError::Conflict`] as well.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the alias is taken
    /// - [`AppError::Exhausted`] if every candidate collided
    /// - [`AppError::BadInput`] if `expires` is not strictly in the future
    /// - [`AppError::StorageUnavailable`] on storage failures
    pub async fn shorten_url(&self, request: ShortenRequest) -> Result<ShortenedUrl, AppError> {
        let ShortenRequest {
            original,
            alias,
            expires,
        } = request;

        let short = match &alias {
            Some(alias) => {
                if self.repository.alias_exists(alias).await? {
                    return Err(AppError::conflict(
                        "This custom alias is already taken",
                        json!({ "alias": alias }),
                    ));
                }
                alias.clone()
            }
            None => self.generate_unique_code().await?,
        };

        if let Some(expires) = expires {
            validate_expiry(expires, Utc::now())?;
        }

        let record = self
            .repository
            .create_url(NewShortUrl {
                short,
                original,
                alias,
                expires,
            })
            .await?;

        metrics::counter!("reductio_urls_created_total").increment(1);
        debug!(short = %record.short, id = record.id, "Short URL created");

        let short_url = self.short_url_for(&record.short);
        Ok(ShortenedUrl { record, short_url })
    }

    /// Composes the public URL for a code.
    pub fn short_url_for(&self, short: &str) -> String {
        format!("{}/{}", self.base_url, short)
    }

    /// Draws candidates until one is unused, at most `max_retries` times.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_retries {
            let candidate = self.generator.generate();

            if !self.repository.short_code_exists(&candidate).await? {
                return Ok(candidate);
            }

            metrics::counter!("reductio_code_collisions_total").increment(1);
            warn!(
                short = %candidate,
                attempt,
                max_retries = self.max_retries,
                "Short code collision detected, retrying"
            );
        }

        Err(AppError::exhausted(
            "Unable to generate unique short code after maximum retries. Please try again.",
            json!({ "attempts": self.max_retries }),
        ))
    }
}

/// Checks that an expiry lies strictly after `now`.
///
/// # Errors
///
/// Returns [`AppError::BadInput`] if `expires <= now`.
pub fn validate_expiry(expires: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if expires <= now {
        return Err(AppError::bad_input(
            "Expiration date must be in the future",
            json!({ "expires": expires.to_rfc3339() }),
        ));
    }

    Ok(())
}

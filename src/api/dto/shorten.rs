//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::application::services::{ShortenRequest, ShortenedUrl};
use crate::error::AppError;
use crate::utils::code_generator::{SHORT_CODE_REGEX, validate_not_reserved};
use crate::utils::url_validator::UrlPolicy;

/// Request body for `POST /shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenUrlRequest {
    /// The destination URL.
    #[validate(url(message = "Invalid URL format"))]
    pub original: String,

    /// Optional custom code used instead of a generated one.
    #[validate(length(min = 3, max = 30, message = "Alias must be between 3 and 30 characters"))]
    #[validate(regex(
        path = "*SHORT_CODE_REGEX",
        message = "Alias can only contain letters, numbers, hyphens, and underscores"
    ))]
    #[validate(custom(function = "validate_not_reserved"))]
    pub alias: Option<String>,

    /// Optional RFC 3339 expiry timestamp.
    pub expires: Option<String>,
}

impl ShortenUrlRequest {
    /// Parses `expires` into a UTC instant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadInput`] if the value is not RFC 3339.
    pub fn parse_expires(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        self.expires
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| {
                        AppError::bad_input(
                            "Invalid expiration date format",
                            json!({ "expires": raw }),
                        )
                    })
            })
            .transpose()
    }

    /// Runs field validation and the destination URL policy, then converts
    /// the body into the service input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadInput`] for the first rule the request breaks.
    pub fn into_checked_request(self, policy: &UrlPolicy) -> Result<ShortenRequest, AppError> {
        self.validate()?;
        policy.check(&self.original)?;
        self.into_service_request()
    }

    /// Converts the validated body into the service input.
    pub fn into_service_request(self) -> Result<ShortenRequest, AppError> {
        let expires = self.parse_expires()?;

        Ok(ShortenRequest {
            original: self.original,
            alias: self.alias,
            expires,
        })
    }
}

/// Successful response for `POST /shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub success: bool,
    pub data: ShortUrlData,
}

/// Public view of a created short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlData {
    pub id: i64,
    pub short: String,
    pub short_url: String,
    pub original: String,
    pub alias: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

impl From<ShortenedUrl> for ShortenResponse {
    fn from(shortened: ShortenedUrl) -> Self {
        let ShortenedUrl { record, short_url } = shortened;

        Self {
            success: true,
            data: ShortUrlData {
                id: record.id,
                short: record.short,
                short_url,
                original: record.original,
                alias: record.alias,
                expires: record.expires,
                created: record.created,
            },
        }
    }
}

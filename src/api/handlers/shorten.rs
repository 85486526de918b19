//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenResponse, ShortenUrlRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original": "https://example.com/some/long/path",
///   "alias": "my-link",                  // optional
///   "expires": "2030-01-01T00:00:00Z"    // optional, RFC 3339
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 1,
///     "short": "my-link",
///     "shortUrl": "https://reduct.io/my-link",
///     "original": "https://example.com/some/long/path",
///     "alias": "my-link",
///     "expires": "2030-01-01T00:00:00Z",
///     "created": "2025-10-01T12:00:00Z"
///   }
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is malformed, fails validation, or the expiry is not in the future
/// - 409 if the alias or generated code is already taken
/// - 503 if no unique code could be drawn or storage is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_input(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let request = payload.into_checked_request(&state.url_policy)?;
    let shortened = state.shorten_service.shorten_url(request).await?;

    Ok((StatusCode::CREATED, Json(shortened.into())))
}

//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_path_code;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject codes that could never have been issued
/// 2. Resolve the code, enforcing activation and expiry
/// 3. Dispatch click recording as a detached task
/// 4. Return 301 Moved Permanently
///
/// The redirect never waits for the click write, and a failed write is only
/// visible in the logs.
///
/// # Errors
///
/// - 400 if the code has an invalid format
/// - 404 if no record uses the code
/// - 410 if the record is deactivated or expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_path_code(&code) {
        return Err(AppError::bad_input(
            "Invalid short code format",
            json!({ "code": code }),
        ));
    }

    let record = state
        .redirect_service
        .resolve_short_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))?;

    state.redirect_service.spawn_click_recording(record.id);

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, record.original)],
    ))
}

//! Service description and fallback handlers.

use axum::{Json, http::Uri};
use serde_json::{Value, json};

use crate::error::AppError;

/// Describes the service and its endpoints.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "shorten": "POST /shorten",
            "redirect": "GET /{code}",
            "health": "GET /health",
            "status": "GET /health/status"
        }
    }))
}

/// Answers any unmatched route with a structured 404.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}

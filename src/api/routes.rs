//! API route configuration.

use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    health_handler, redirect_handler, root_handler, shorten_handler, status_handler,
};
use crate::api::middleware::rate_limit;
use crate::config::Config;
use crate::state::AppState;

/// Unthrottled routes.
///
/// # Endpoints
///
/// - `GET /`              - Service description
/// - `GET /health`        - Storage health check
/// - `GET /health/status` - Version, uptime and counts
/// - `GET /{code}`        - Short link redirect
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/health/status", get(status_handler))
        .route("/{code}", get(redirect_handler))
}

/// Creation routes, rate limited per client IP.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short URL
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn shorten_routes(config: &Config) -> anyhow::Result<Router<AppState>> {
    let limiter = rate_limit::layer(
        Duration::from_millis(config.rate_limit_window_ms),
        config.rate_limit_max_requests,
    )?;

    Ok(Router::new()
        .route("/shorten", post(shorten_handler))
        .layer(limiter))
}

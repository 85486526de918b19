//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Service description
//! - `POST /shorten`       - Create a short URL (rate limited)
//! - `GET  /{code}`        - Short link redirect
//! - `GET  /health`        - Storage health check
//! - `GET  /health/status` - Version, uptime and counts
//! - anything else         - 404 JSON
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, any origin
//! - **Security headers** - `nosniff`, `DENY` framing, `no-referrer`
//! - **Rate limiting** - Per-IP token bucket on `/shorten`
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::not_found_handler;
use crate::api::middleware::{security_headers, tracing};
use crate::config::Config;
use crate::state::AppState;

/// Builds every route and layer except path normalization.
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_routes(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let router = Router::new()
        .merge(api::routes::public_routes())
        .merge(api::routes::shorten_routes(config)?)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(CorsLayer::permissive());

    Ok(security_headers::apply(router).layer(tracing::layer()))
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/health/` reaches the
/// same handler as `/health`.
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_router(state: AppState, config: &Config) -> anyhow::Result<NormalizePath<Router>> {
    let router = app_routes(state, config)?;
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

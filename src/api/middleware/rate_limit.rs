//! Rate limiting middleware using token bucket algorithm.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates the rate limiter for `POST /shorten`.
///
/// # Limits
///
/// Each client IP gets a bucket of `max_requests` tokens that refills
/// completely over `window`, so a client can burst up to `max_requests`
/// and then sustain `max_requests` per `window`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address. The server must be started with connect info.
///
/// # Errors
///
/// Returns an error if `max_requests` is zero.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(rate_limit::layer(Duration::from_secs(900), 100)?);
/// ```
pub fn layer(
    window: Duration,
    max_requests: u32,
) -> anyhow::Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>>
{
    let period = replenish_period(window, max_requests);

    let governor_conf = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(max_requests)
        .finish()
        .context("Rate limit requires a non-zero window and request count")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Time needed to regain one token.
fn replenish_period(window: Duration, max_requests: u32) -> Duration {
    (window / max_requests.max(1)).max(Duration::from_nanos(1))
}

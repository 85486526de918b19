//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] port and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Code selection, collision retry and creation
//! - [`services::redirect_service::RedirectService`] - Resolution policy and click recording
//! - [`services::stats_service::StatsService`] - Aggregate counts

pub mod services;

//! # URL Reductio
//!
//! A URL shortening service built with Axum and pluggable storage backends.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities and the storage port
//! - **Application Layer** ([`application`]) - Shortening, resolution and statistics engines
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL, Redis and in-memory storage
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random short codes from a 58-character alphabet without look-alike characters
//! - Custom aliases sharing one namespace with generated codes
//! - Expiring and deactivatable links (`410 Gone`)
//! - Fire-and-forget click recording
//! - Per-IP rate limiting on creation
//!
//! ## Quick Start
//!
//! ```bash
//! export BASE_URL="http://localhost:3000"
//! export STORAGE_BACKEND="memory"
//!
//! cargo run
//!
//! curl -X POST localhost:3000/shorten \
//!     -H 'content-type: application/json' \
//!     -d '{"original": "https://example.com", "alias": "example"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

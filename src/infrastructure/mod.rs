//! Infrastructure layer for external integrations.
//!
//! This layer implements the storage port defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, Redis and in-memory repository implementations

pub mod persistence;

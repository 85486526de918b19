//! Repository trait definitions for the domain layer.
//!
//! The storage port is expressed as a single trait, [`UrlRepository`]. Concrete
//! backends live in `crate::infrastructure::persistence` and are chosen at
//! startup from configuration; services hold them as `Arc<dyn UrlRepository>`.
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.
//! Backend contract tests live in `tests/repository_contract.rs`.

pub mod url_repository;

pub use url_repository::UrlRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;

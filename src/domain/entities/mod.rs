//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without storage concerns.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A short code mapped to its destination URL
//! - [`Click`] - One recorded redirect of a short URL
//!
//! Creation input is modelled separately as [`NewShortUrl`], since `id`,
//! `created` and `active` are assigned by storage.

pub mod click;
pub mod short_url;

pub use click::Click;
pub use short_url::{NewShortUrl, ShortUrl};

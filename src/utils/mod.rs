//! Utility functions for code generation and input checks.
//!
//! - [`code_generator`] - Short code generation and alias rules
//! - [`url_validator`] - Destination URL policy

pub mod code_generator;
pub mod url_validator;

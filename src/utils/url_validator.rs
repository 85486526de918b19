//! Destination URL policy checks applied before shortening.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Limits on which destination URLs may be shortened.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    pub max_length: usize,
    pub allowed_protocols: Vec<String>,
}

impl UrlPolicy {
    pub fn new(max_length: usize, allowed_protocols: Vec<String>) -> Self {
        Self {
            max_length,
            allowed_protocols,
        }
    }

    /// Checks length, syntax and scheme of a destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadInput`] if the URL is too long, cannot be parsed,
    /// or uses a scheme outside `allowed_protocols`.
    pub fn check(&self, raw: &str) -> Result<(), AppError> {
        if raw.len() > self.max_length {
            return Err(AppError::bad_input(
                format!("URL exceeds maximum length of {} characters", self.max_length),
                json!({ "max_length": self.max_length, "provided_length": raw.len() }),
            ));
        }

        let parsed = Url::parse(raw).map_err(|e| {
            AppError::bad_input("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if !self
            .allowed_protocols
            .iter()
            .any(|p| p.eq_ignore_ascii_case(parsed.scheme()))
        {
            return Err(AppError::bad_input(
                "Invalid URL format",
                json!({ "reason": "unsupported protocol", "protocol": parsed.scheme() }),
            ));
        }

        Ok(())
    }
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::new(2048, vec!["http".to_string(), "https".to_string()])
    }
}

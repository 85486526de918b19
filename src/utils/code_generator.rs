//! Short code generation and alias validation utilities.
//!
//! Generated codes are drawn uniformly at random from a 58-character alphabet
//! that leaves out characters which are easy to misread (`0`, `O`, `I`, `l`).
//! Collision handling is the caller's concern; the generator has no knowledge
//! of storage.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// URL-safe alphabet without visually ambiguous characters.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Aliases that would shadow service routes.
pub const RESERVED_ALIASES: &[&str] = &[
    "api",
    "admin",
    "analytics",
    "stats",
    "dashboard",
    "health",
    "status",
];

/// Characters accepted in aliases and in short codes on the redirect path.
pub static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("short code pattern is valid"));

/// Maximum length of a short code accepted on the redirect path.
pub const MAX_PATH_CODE_LENGTH: usize = 50;

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code. Each call is independent of the previous ones.
    fn generate(&self) -> String;
}

/// Generates codes of a fixed length from [`ALPHABET`] using the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Rejects aliases that collide with reserved route names (case-insensitive).
///
/// Used as a `validator` custom rule on the shorten request.
pub fn validate_not_reserved(alias: &str) -> Result<(), ValidationError> {
    if RESERVED_ALIASES.contains(&alias.to_ascii_lowercase().as_str()) {
        let mut err = ValidationError::new("reserved");
        err.message = Some("This alias is reserved and cannot be used".into());
        return Err(err);
    }

    Ok(())
}

/// Returns true if `code` may be looked up on the redirect path.
pub fn is_valid_path_code(code: &str) -> bool {
    code.len() <= MAX_PATH_CODE_LENGTH && SHORT_CODE_REGEX.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_58_unique_characters() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 58);
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_characters() {
        for c in [b'0', b'O', b'I', b'l'] {
            assert!(!ALPHABET.contains(&c), "'{}' must be excluded", c as char);
        }
    }

    #[test]
    fn test_generate_default_length() {
        let code = RandomCodeGenerator::default().generate();
        assert_eq!(code.len(), 7);
    }

    #[test]
    fn test_generate_configured_length() {
        for length in [4, 10, 32] {
            let code = RandomCodeGenerator::new(length).generate();
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn test_generate_only_alphabet_characters() {
        let generator = RandomCodeGenerator::new(16);

        for _ in 0..500 {
            let code = generator.generate();
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn test_generate_produces_distinct_codes() {
        let generator = RandomCodeGenerator::default();
        let codes: HashSet<_> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_covers_alphabet() {
        let generator = RandomCodeGenerator::new(64);
        let seen: HashSet<u8> = (0..200).flat_map(|_| generator.generate().into_bytes()).collect();

        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn test_reserved_alias_rejected_case_insensitive() {
        assert!(validate_not_reserved("admin").is_err());
        assert!(validate_not_reserved("Health").is_err());
        assert!(validate_not_reserved("STATUS").is_err());
    }

    #[test]
    fn test_all_reserved_aliases_rejected() {
        for &reserved in RESERVED_ALIASES {
            assert!(
                validate_not_reserved(reserved).is_err(),
                "Reserved alias '{}' should be invalid",
                reserved
            );
        }
    }

    #[test]
    fn test_regular_alias_accepted() {
        assert!(validate_not_reserved("mylink").is_ok());
        assert!(validate_not_reserved("admin-page").is_ok());
    }

    #[test]
    fn test_path_code_validation() {
        assert!(is_valid_path_code("aB3kP9x"));
        assert!(is_valid_path_code("my_link-2026"));
        assert!(!is_valid_path_code("bad code"));
        assert!(!is_valid_path_code("semi;colon"));
        assert!(!is_valid_path_code(""));
        assert!(!is_valid_path_code(&"a".repeat(51)));
        assert!(is_valid_path_code(&"a".repeat(50)));
    }
}

//! Identifier validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for tenant and knowledge base identifiers
pub const MAX_ID_LENGTH: usize = 50;

/// Identifiers are alphanumeric with hyphens/underscores, no leading or
/// trailing separator.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

/// Identifier validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum IdValidationError {
    /// Identifier is empty
    Empty,
    /// Identifier exceeds maximum length
    TooLong { length: usize, max: usize },
    /// Identifier contains invalid characters
    InvalidFormat { id: String },
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Identifier cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Identifier too long: {} characters (max {})", length, max)
            }
            Self::InvalidFormat { id } => {
                write!(
                    f,
                    "Invalid identifier '{}': must be alphanumeric with hyphens or underscores",
                    id
                )
            }
        }
    }
}

impl std::error::Error for IdValidationError {}

/// Validate a tenant or knowledge base identifier
pub fn validate_id(id: &str) -> Result<(), IdValidationError> {
    if id.is_empty() {
        return Err(IdValidationError::Empty);
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong {
            length: id.len(),
            max: MAX_ID_LENGTH,
        });
    }

    if !ID_PATTERN.is_match(id) {
        return Err(IdValidationError::InvalidFormat { id: id.to_string() });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(validate_id("support-docs").is_ok());
        assert!(validate_id("tenant_42").is_ok());
        assert!(validate_id("a").is_ok());
        assert!(validate_id("kb-2024-faq").is_ok());
    }

    #[test]
    fn test_empty_id() {
        assert_eq!(validate_id(""), Err(IdValidationError::Empty));
    }

    #[test]
    fn test_id_too_long() {
        let id = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            validate_id(&id),
            Err(IdValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_format() {
        assert!(validate_id("-leading").is_err());
        assert!(validate_id("trailing-").is_err());
        assert!(validate_id("has spaces").is_err());
        assert!(validate_id("acentuação").is_err());
    }
}

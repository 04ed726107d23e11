//! Data-validation markers for bound input fields.
//!
//! Widgets that reject or cannot commit user input expose the outcome as a
//! [`ValidationResult`] so hosts can show an error indicator next to the
//! field without the widget itself failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation result for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Validation passed.
    #[default]
    Valid,
    /// Validation failed with an error message.
    Invalid(String),
}

impl ValidationResult {
    /// Build an invalid result from any displayable error.
    pub fn invalid(error: impl fmt::Display) -> Self {
        Self::Invalid(error.to_string())
    }

    /// Check if validation passed.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if validation failed.
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Get the error message if invalid.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(msg) => Some(msg),
            Self::Valid => None,
        }
    }
}

impl<T, E: fmt::Display> From<&Result<T, E>> for ValidationResult {
    fn from(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(e) => Self::invalid(e),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
        }
    }
}

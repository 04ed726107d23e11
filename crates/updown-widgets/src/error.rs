//! Error types for numeric input widgets.

use thiserror::Error;

/// Errors raised while converting or committing a numeric value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    /// Text cannot be parsed into a number under the active rules.
    #[error("input string was not in a correct format: {text:?}")]
    Format {
        /// The rejected text.
        text: String,
    },

    /// Value lies outside `[minimum, maximum]` while clipping is disabled.
    #[error("value {value} is out of range [{minimum}, {maximum}]")]
    Range {
        /// The rejected value.
        value: f64,
        /// Lower bound at the time of the check.
        minimum: f64,
        /// Upper bound at the time of the check.
        maximum: f64,
    },

    /// A spin message arrived without its `SpinEventArgs` payload.
    #[error("spin request carried no event arguments")]
    MissingSpinArgs,

    /// A custom text converter rejected the text.
    #[error("text converter failed: {0}")]
    Converter(String),
}

impl NumericError {
    /// Create a format error for the given text.
    pub fn format(text: impl Into<String>) -> Self {
        Self::Format { text: text.into() }
    }

    /// Whether this error is a parse failure rather than a policy violation.
    ///
    /// Parse failures are absorbed by reconciliation; everything else propagates.
    pub const fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Converter(_))
    }
}

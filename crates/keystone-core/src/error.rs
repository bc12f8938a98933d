//! Error types for the core crate.

use thiserror::Error;

/// Maximum length for value display in error messages.
const MAX_VALUE_DISPLAY_LEN: usize = 100;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An encoding name was not found in the registry.
    #[error("unknown encoding: {0}")]
    Configuration(String),

    /// A value could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl CoreError {
    /// Creates an encoding error naming the encoding and, truncated, the input.
    #[must_use]
    pub fn encoding_with_input(
        encoding: &str,
        reason: impl std::fmt::Display,
        input: impl std::fmt::Display,
    ) -> Self {
        let input = input.to_string();
        let truncated = if input.chars().count() > MAX_VALUE_DISPLAY_LEN {
            let cut: String = input.chars().take(MAX_VALUE_DISPLAY_LEN).collect();
            format!("{cut}...")
        } else {
            input
        };
        Self::Encoding(format!("{encoding}: {reason} (input: {truncated})"))
    }
}

//! Error types for the presentation shell.

use thiserror::Error;

/// Result type alias for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors raised while turning user text into an input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No integers in the text.
    #[error("Array must contain at least 1 element.")]
    Empty,

    /// A token that is not an optionally negative run of digits.
    #[error("Only integers separated by commas are allowed. (got '{token}')")]
    InvalidToken { token: String },

    /// A well-formed integer that does not fit in 64 bits.
    #[error("Integer out of range: {token}")]
    OutOfRange { token: String },
}

/// Errors that can occur in the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Invalid user input.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Unrecognized interactive command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Example case lookup failed.
    #[error("No example case {0}")]
    UnknownCase(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

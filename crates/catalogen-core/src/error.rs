use thiserror::Error;

/// Core error type shared across catalogen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Locale input could not be normalized into a usable tag sequence.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    /// A generated draft violates the record shape.
    #[error("invalid draft: {0}")]
    InvalidDraft(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by catalogen crates.
pub type Result<T> = std::result::Result<T, Error>;

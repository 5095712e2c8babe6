use thiserror::Error;

/// Top-level error type for the trivia service.
///
/// Each variant names the subsystem that failed. The API layer maps these
/// onto its client-facing error taxonomy; the messages carried here are for
/// logs only and are never sent to callers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriviaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TriviaError {
    fn from(err: toml::de::Error) -> Self {
        TriviaError::Config(err.to_string())
    }
}

/// A specialized `Result` type for trivia operations.
pub type Result<T> = std::result::Result<T, TriviaError>;

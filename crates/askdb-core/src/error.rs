use thiserror::Error;

/// Top-level error type shared across the askdb crates.
///
/// Downstream crates keep their own narrower error enums and convert into
/// this one at the boundary, so `?` composes from an HTTP failure in the
/// client all the way up to the binary without manual mapping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AskdbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AskdbError {
    fn from(err: toml::de::Error) -> Self {
        AskdbError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AskdbError {
    fn from(err: toml::ser::Error) -> Self {
        AskdbError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AskdbError {
    fn from(err: serde_json::Error) -> Self {
        AskdbError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for askdb operations.
pub type Result<T> = std::result::Result<T, AskdbError>;

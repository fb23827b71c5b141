use thiserror::Error;

/// Top-level error type for the Kete workspace.
///
/// Crate-specific errors (the chat session's rejections, the query
/// client's failures) live next to their code; this type covers the
/// shared concerns of configuration, I/O and serialization so that the
/// binary can propagate them with `?`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

impl From<toml::de::Error> for KeteError {
    fn from(err: toml::de::Error) -> Self {
        KeteError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for KeteError {
    fn from(err: toml::ser::Error) -> Self {
        KeteError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KeteError {
    fn from(err: serde_json::Error) -> Self {
        KeteError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Kete operations.
pub type Result<T> = std::result::Result<T, KeteError>;

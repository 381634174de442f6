/// Domain-specific error types for the marketplace board.
#[derive(Debug, thiserror::Error)]
pub enum BazaarError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Document store operation failed: {0}")]
    Store(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias.
pub type BazaarResult<T> = Result<T, BazaarError>;

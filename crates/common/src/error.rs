use thiserror::Error;

/// Top-level error type for TrustRAG operations.
#[derive(Debug, Error)]
pub enum TrustRagError {
    // --- Caller mistakes (rejected request, nothing ran) ---
    #[error("Invalid input: {0}")]
    Input(String),

    // --- Collaborator failures (whole evaluation fails, no partial result) ---
    #[error("Embedding API error: {0}")]
    EmbeddingApi(String),

    #[error("Embedding call timed out after {0}ms")]
    EmbeddingTimeout(u64),

    #[error("No embedding provider configured")]
    EmbeddingUnavailable,

    // --- Operational errors ---
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl TrustRagError {
    /// Whether this error is the caller's fault (maps to a 4xx rejection).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Whether this error came from the embedding collaborator
    /// (the evaluation failed as a whole; retrying the request may succeed).
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingApi(_) | Self::EmbeddingTimeout(_) | Self::EmbeddingUnavailable
        )
    }
}

/// Result type alias for TrustRAG operations.
pub type Result<T> = std::result::Result<T, TrustRagError>;

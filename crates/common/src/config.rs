use serde::{Deserialize, Serialize};

/// Top-level system configuration, deserialized from system.toml.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    pub embeddings: EmbeddingConfig,
    pub detection: DetectionConfig,
    pub retry: RetryDefaults,
    pub limits: RequestLimits,
}

/// Embedding provider configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("openai").
    pub provider: String,
    /// Model identifier (e.g. "text-embedding-3-small").
    pub model: String,
    /// Embedding vector dimensions.
    pub dimensions: u32,
    /// Max texts per batch API call.
    pub batch_size: u32,
    /// Wall-clock budget for one evaluation's embedding work, in milliseconds.
    /// Expiry fails the whole evaluation — partial similarity data is never used.
    pub timeout_ms: u64,
}

/// Hallucination-detection thresholds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Cosine similarity below this flags a sentence as LOW_SIMILARITY.
    /// The verifier itself stays threshold-agnostic; only aggregation applies this.
    pub similarity_threshold: f32,
}

/// Default retry parameters, per collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryDefaults {
    pub embedding_api: RetryConfig,
}

/// Retry configuration for a specific target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

/// Request-size bounds enforced at the service surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestLimits {
    /// Max retrieved chunks accepted per evaluation.
    pub max_chunks_per_request: u32,
    /// Max answer length in characters.
    pub max_answer_chars: u32,
}

use serde::{Deserialize, Serialize};

/// Aggregate trust metrics for one evaluation, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustMetrics {
    /// Fraction of sentences judged trustworthy (reason NONE).
    /// An empty answer is vacuously faithful: 1.0.
    pub faithfulness: f64,
    /// Cosine similarity between the query embedding and the full-answer
    /// embedding, clamped to [0, 1]. Measures topicality, not support.
    pub answer_relevance: f64,
    /// Fraction of retrieved chunks referenced by at least one valid
    /// citation. Measures retrieval usefulness; 0.0 with zero chunks.
    pub context_precision: f64,
}

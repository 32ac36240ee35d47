mod openai;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use trustrag_common::config::{EmbeddingConfig, RetryConfig};
use trustrag_common::TrustRagError;

/// Client for computing text embeddings via an external API.
pub struct EmbeddingClient {
    http: reqwest::Client,
    config: EmbeddingConfig,
    retry_config: RetryConfig,
    api_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding API HTTP error: {0}")]
    Http(String),

    #[error("Embedding API auth error: {0}")]
    Auth(String),

    #[error("Embedding API rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: u32, got: usize },

    #[error("Embedding call exceeded {0}ms budget")]
    Timeout(u64),

    #[error("Embedding API error: {0}")]
    Api(String),
}

impl EmbeddingError {
    /// Whether this error should not be retried.
    fn is_non_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::Auth(_) | EmbeddingError::DimensionMismatch { .. }
        )
    }
}

impl From<EmbeddingError> for TrustRagError {
    fn from(e: EmbeddingError) -> Self {
        match e {
            EmbeddingError::Timeout(ms) => TrustRagError::EmbeddingTimeout(ms),
            other => TrustRagError::EmbeddingApi(other.to_string()),
        }
    }
}

impl EmbeddingClient {
    /// Create a new embedding client.
    /// Reads the API key from `OPENAI_API_KEY` env var.
    /// Returns None if the key is not set (graceful degradation —
    /// the service starts but rejects evaluation requests).
    pub fn new(config: EmbeddingConfig, retry_config: RetryConfig) -> Option<Self> {
        let api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!(
                    "OPENAI_API_KEY not set — embedding client disabled. \
                     Evaluation requests will be rejected."
                );
                return None;
            }
        };

        Some(Self {
            http: reqwest::Client::new(),
            config,
            retry_config,
            api_key,
        })
    }

    /// Embed a batch of texts, preserving input order.
    ///
    /// Splits into sub-batches per config.batch_size. The whole call runs
    /// under the configured timeout budget; expiry fails the batch — the
    /// pipeline never aggregates partial similarity data.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let budget = Duration::from_millis(self.config.timeout_ms);
        tokio::time::timeout(budget, self.embed_all(texts))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.config.timeout_ms))?
    }

    /// Get the configured embedding dimensions.
    pub fn dimensions(&self) -> u32 {
        self.config.dimensions
    }

    async fn embed_all(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let batch_size = self.config.batch_size as usize;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(batch_size) {
            let embeddings = self.call_api(chunk).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    /// Call the OpenAI-compatible embedding API with retry logic.
    async fn call_api(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut attempt = 0u32;
        let mut backoff_ms = self.retry_config.initial_backoff_ms;

        loop {
            attempt += 1;
            let result =
                openai::call_embeddings_api(&self.http, &self.api_key, &self.config, texts).await;

            match result {
                Ok(embeddings) => return Ok(embeddings),
                Err(ref e) if e.is_non_retryable() => {
                    metrics::counter!("embedding.api.errors").increment(1);
                    return result;
                }
                Err(EmbeddingError::RateLimited { retry_after }) => {
                    if attempt >= self.retry_config.max_attempts {
                        metrics::counter!("embedding.api.errors").increment(1);
                        return Err(EmbeddingError::RateLimited { retry_after });
                    }
                    let wait = retry_after.map(|s| s * 1000).unwrap_or(backoff_ms);
                    tracing::warn!(attempt, wait_ms = wait, "Rate limited, retrying");
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
                Err(e) => {
                    if attempt >= self.retry_config.max_attempts {
                        metrics::counter!("embedding.api.errors").increment(1);
                        return Err(e);
                    }
                    let jitter = if self.retry_config.jitter {
                        compute_jitter(attempt, backoff_ms)
                    } else {
                        0
                    };
                    let wait = backoff_ms + jitter;
                    tracing::warn!(attempt, wait_ms = wait, error = %e, "Embedding API error, retrying");
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    backoff_ms = (backoff_ms as f64 * self.retry_config.backoff_multiplier) as u64;
                    backoff_ms = backoff_ms.min(self.retry_config.max_backoff_ms);
                }
            }
        }
    }
}

/// Compute jitter for retry backoff using simple hash-based approach.
fn compute_jitter(attempt: u32, backoff_ms: u64) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::hash::DefaultHasher::new();
    attempt.hash(&mut hasher);
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos()
        .hash(&mut hasher);
    hasher.finish() % (backoff_ms / 2 + 1)
}

/// Object-safe embedding seam (dyn dispatch).
///
/// The pipeline depends only on this trait; must be deterministic for
/// identical input text within a session. Tests provide an in-process
/// implementation; production uses EmbeddingClient.
pub trait EmbeddingProvider: Send + Sync {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send + 'a>>;
}

impl EmbeddingProvider for EmbeddingClient {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send + 'a>> {
        Box::pin(self.embed_batch(texts))
    }
}

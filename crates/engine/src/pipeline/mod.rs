pub mod aggregate;
pub mod attribution;
pub mod citation;
pub mod similarity;

use std::sync::Arc;

use trustrag_common::config::DetectionConfig;
use trustrag_common::types::{PipelineResult, SourceChunk};
use trustrag_common::{Result, TrustRagError};

use crate::embeddings::EmbeddingProvider;
use citation::{SentenceSplitter, TerminalPunctuationSplitter};

/// One evaluation's inputs: the user query, the generated answer, and the
/// chunks the generator was conditioned on, in retrieval order.
#[derive(Clone, Debug)]
pub struct EvaluationRequest {
    pub query: String,
    pub answer: String,
    pub chunks: Vec<SourceChunk>,
}

/// The hallucination-detection and trust-metrics pipeline.
///
/// Stateless and request-scoped: every value it builds is immutable once
/// constructed and lives for one evaluate() call. The only external call
/// is the embedding batch; its failure or timeout fails the whole request.
pub struct TrustPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    splitter: Box<dyn SentenceSplitter>,
    detection: DetectionConfig,
}

impl TrustPipeline {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, detection: DetectionConfig) -> Self {
        Self {
            provider,
            splitter: Box::new(TerminalPunctuationSplitter),
            detection,
        }
    }

    /// Replace the default sentence splitter.
    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Run the full pipeline: parse citations, validate attribution, score
    /// semantic support, aggregate trust metrics.
    ///
    /// Returns a complete PipelineResult or an error — never a partially
    /// filled result. An empty query is rejected; an empty answer is a
    /// defined degenerate input (zero sentences, faithfulness 1.0).
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<PipelineResult> {
        let start = std::time::Instant::now();

        if request.query.trim().is_empty() {
            return Err(TrustRagError::Input("query must not be empty".into()));
        }

        let sentences = citation::parse_answer(&request.answer, self.splitter.as_ref());
        let chunk_count = request.chunks.len();

        // One batched embedding call per request, fixed slot order:
        // query, answer, sentences in order, chunks in rank order. Slicing
        // a single response keeps batched and sequential execution identical.
        let mut texts = Vec::with_capacity(2 + sentences.len() + chunk_count);
        texts.push(request.query.clone());
        texts.push(request.answer.clone());
        texts.extend(sentences.iter().map(|s| s.text.clone()));
        texts.extend(request.chunks.iter().map(|c| c.text.clone()));

        let embeddings = self.embed_slots(&texts).await?;
        let query_embedding = &embeddings[0];
        let answer_embedding = &embeddings[1];
        let sentence_embeddings = &embeddings[2..2 + sentences.len()];
        let chunk_embeddings = &embeddings[2 + sentences.len()..];

        let attributions = sentences
            .iter()
            .map(|s| attribution::validate_attribution(s, chunk_count))
            .collect::<Vec<_>>();

        let similarities = sentences
            .iter()
            .zip(sentence_embeddings)
            .map(|(s, embedding)| {
                similarity::best_match(s.index, embedding, &request.chunks, chunk_embeddings)
            })
            .collect::<Vec<_>>();

        let result = aggregate::assemble(
            &request.answer,
            sentences,
            attributions,
            similarities,
            query_embedding,
            answer_embedding,
            chunk_count,
            self.detection.similarity_threshold,
        );

        metrics::histogram!("pipeline.evaluate.latency").record(start.elapsed().as_secs_f64());
        metrics::counter!("pipeline.sentences.total").increment(result.sentences.len() as u64);
        tracing::info!(
            sentences = result.sentences.len(),
            chunks = chunk_count,
            faithfulness = result.metrics.faithfulness,
            answer_relevance = result.metrics.answer_relevance,
            context_precision = result.metrics.context_precision,
            "Evaluation complete"
        );

        Ok(result)
    }

    /// Embed every slot, skipping degenerate text.
    ///
    /// Empty/whitespace slots never reach the provider (some APIs reject
    /// empty input) and come back as all-zero vectors, which cosine maps
    /// to the documented 0.0 fallback.
    async fn embed_slots(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut non_empty: Vec<String> = Vec::new();
        let mut slots: Vec<Option<usize>> = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                slots.push(None);
            } else {
                slots.push(Some(non_empty.len()));
                non_empty.push(text.clone());
            }
        }

        let embedded = self
            .provider
            .embed_batch(&non_empty)
            .await
            .map_err(TrustRagError::from)?;

        if embedded.len() != non_empty.len() {
            return Err(TrustRagError::EmbeddingApi(format!(
                "expected {} embeddings, got {}",
                non_empty.len(),
                embedded.len()
            )));
        }

        let dims = embedded.first().map(|v| v.len()).unwrap_or(0);
        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Some(i) => embedded[i].clone(),
                None => vec![0.0; dims],
            })
            .collect())
    }
}

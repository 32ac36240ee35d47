//! Full-pipeline tests driven through a deterministic in-process embedding
//! provider. No network; the keyword projection below gives texts sharing
//! vocabulary a high cosine and unrelated texts a cosine of zero.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use trustrag_common::config::DetectionConfig;
use trustrag_common::types::{FlagReason, SourceChunk};
use trustrag_common::{DocumentId, TrustRagError};
use trustrag_engine::embeddings::{EmbeddingError, EmbeddingProvider};
use trustrag_engine::pipeline::{EvaluationRequest, TrustPipeline};

const VOCAB: &[&str] = &[
    "paris", "capital", "france", "moon", "cheese", "city", "landmark",
];

/// Projects text onto keyword-count dimensions. Deterministic for identical
/// input and independent of batch composition.
struct KeywordEmbedder;

impl EmbeddingProvider for KeywordEmbedder {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send + 'a>> {
        let embeddings = texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                VOCAB
                    .iter()
                    .map(|word| lower.matches(word).count() as f32)
                    .collect()
            })
            .collect();
        Box::pin(async move { Ok(embeddings) })
    }
}

/// Always fails — stands in for a dead embedding collaborator.
struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed_batch<'a>(
        &'a self,
        _texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send + 'a>> {
        Box::pin(async move { Err(EmbeddingError::Api("connection refused".into())) })
    }
}

fn pipeline() -> TrustPipeline {
    TrustPipeline::new(
        Arc::new(KeywordEmbedder),
        DetectionConfig {
            similarity_threshold: 0.5,
        },
    )
}

fn chunk(text: &str) -> SourceChunk {
    SourceChunk::new(text.into(), DocumentId::new())
}

fn request(query: &str, answer: &str, chunks: Vec<SourceChunk>) -> EvaluationRequest {
    EvaluationRequest {
        query: query.into(),
        answer: answer.into(),
        chunks,
    }
}

#[tokio::test]
async fn supported_and_uncited_sentences_split_faithfulness() {
    let req = request(
        "What is the capital of France?",
        "Paris is the capital of France [Source 1]. The moon is made of cheese.",
        vec![chunk("Paris is the capital and largest city of France.")],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");

    assert_eq!(result.sentences.len(), 2);
    assert_eq!(result.sentences[0].reason, FlagReason::None);
    assert!(!result.sentences[0].flagged);
    assert_eq!(result.sentences[1].reason, FlagReason::NoCitation);
    assert!(result.sentences[1].flagged);
    assert_eq!(result.metrics.faithfulness, 0.5);
    // The single retrieved chunk is cited once, validly.
    assert_eq!(result.metrics.context_precision, 1.0);
    assert!(result.metrics.answer_relevance > 0.0);
}

#[tokio::test]
async fn cited_but_unsupported_sentence_flags_low_similarity() {
    let req = request(
        "What is the capital of France?",
        "The moon is made of cheese [Source 1].",
        vec![chunk("Paris is the capital and largest city of France.")],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");

    assert_eq!(result.sentences[0].reason, FlagReason::LowSimilarity);
    let sim = result.sentences[0].similarity.as_ref().expect("similarity");
    assert!(sim.score < 0.5);
    assert_eq!(result.metrics.faithfulness, 0.0);
}

#[tokio::test]
async fn phantom_citation_flags_invalid() {
    let req = request(
        "What is the capital of France?",
        "Paris is the capital of France [Source 5].",
        vec![
            chunk("Paris is the capital and largest city of France."),
            chunk("The Eiffel Tower is a Paris landmark."),
        ],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");

    assert_eq!(result.sentences[0].reason, FlagReason::InvalidCitation);
    assert!(result.sentences[0].attribution.valid_ids.is_empty());
    assert_eq!(
        result.sentences[0].attribution.cited_ids,
        std::collections::BTreeSet::from([5])
    );
}

#[tokio::test]
async fn zero_chunks_never_validates_and_reports_no_similarity() {
    let req = request(
        "What is the capital of France?",
        "Paris is nice. See the details [Source 1].",
        vec![],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");

    assert_eq!(result.sentences[0].reason, FlagReason::NoCitation);
    assert_eq!(result.sentences[1].reason, FlagReason::InvalidCitation);
    for sentence in &result.sentences {
        assert!(sentence.similarity.is_none());
    }
    assert_eq!(result.metrics.faithfulness, 0.0);
    assert_eq!(result.metrics.context_precision, 0.0);
}

#[tokio::test]
async fn empty_answer_is_vacuously_faithful() {
    let req = request(
        "What is the capital of France?",
        "",
        vec![chunk("Paris is the capital and largest city of France.")],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");

    assert!(result.sentences.is_empty());
    assert_eq!(result.metrics.faithfulness, 1.0);
    assert_eq!(result.metrics.answer_relevance, 0.0);
    assert_eq!(result.metrics.context_precision, 0.0);
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let req = request("   ", "Paris is the capital of France [Source 1].", vec![]);

    let err = pipeline().evaluate(&req).await.expect_err("should reject");
    assert!(matches!(err, TrustRagError::Input(_)));
}

#[tokio::test]
async fn embedding_failure_fails_the_whole_evaluation() {
    let failing = TrustPipeline::new(
        Arc::new(FailingEmbedder),
        DetectionConfig {
            similarity_threshold: 0.5,
        },
    );
    let req = request(
        "What is the capital of France?",
        "Paris is the capital of France [Source 1].",
        vec![chunk("Paris is the capital and largest city of France.")],
    );

    let err = failing.evaluate(&req).await.expect_err("should fail");
    assert!(matches!(err, TrustRagError::EmbeddingApi(_)));
}

#[tokio::test]
async fn evaluation_is_idempotent() {
    let req = request(
        "What is the capital of France?",
        "Paris is the capital of France [Source 1]. The moon is made of cheese.",
        vec![
            chunk("Paris is the capital and largest city of France."),
            chunk("The Eiffel Tower is a Paris landmark."),
        ],
    );

    let p = pipeline();
    let first = p.evaluate(&req).await.expect("first run");
    let second = p.evaluate(&req).await.expect("second run");

    assert_eq!(first, second);
}

#[tokio::test]
async fn citing_a_new_chunk_never_decreases_context_precision() {
    let chunks = vec![
        chunk("Paris is the capital and largest city of France."),
        chunk("The Eiffel Tower is a Paris landmark."),
    ];

    let before = pipeline()
        .evaluate(&request(
            "Tell me about Paris.",
            "Paris is the capital of France [Source 1].",
            chunks.clone(),
        ))
        .await
        .expect("before");

    let after = pipeline()
        .evaluate(&request(
            "Tell me about Paris.",
            "Paris is the capital of France [Source 1]. \
             The Eiffel Tower is a landmark in Paris [Source 2].",
            chunks,
        ))
        .await
        .expect("after");

    assert!(after.metrics.context_precision >= before.metrics.context_precision);
    assert_eq!(before.metrics.context_precision, 0.5);
    assert_eq!(after.metrics.context_precision, 1.0);
}

/// Splits on newlines instead of punctuation — stands in for a caller's
/// custom segmenter.
struct LineSplitter;

impl trustrag_engine::pipeline::citation::SentenceSplitter for LineSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }
}

#[tokio::test]
async fn splitter_is_injectable() {
    let p = pipeline().with_splitter(Box::new(LineSplitter));
    let req = request(
        "Tell me about Paris.",
        "Paris is the capital of France [Source 1]\nno punctuation needed here",
        vec![chunk("Paris is the capital and largest city of France.")],
    );

    let result = p.evaluate(&req).await.expect("evaluate");

    assert_eq!(result.sentences.len(), 2);
    assert_eq!(result.sentences[0].attribution.cited_ids.len(), 1);
    assert_eq!(result.sentences[1].reason, FlagReason::NoCitation);
}

#[tokio::test]
async fn duplicate_citations_of_one_chunk_count_once() {
    let req = request(
        "Tell me about Paris.",
        "Paris is the capital of France [Source 1] [Source 1]. \
         Paris is in France [Source 1].",
        vec![
            chunk("Paris is the capital and largest city of France."),
            chunk("The Eiffel Tower is a Paris landmark."),
        ],
    );

    let result = pipeline().evaluate(&req).await.expect("evaluate");
    assert_eq!(result.metrics.context_precision, 0.5);
}

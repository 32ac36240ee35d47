use std::collections::BTreeSet;

use trustrag_common::types::{
    AnswerSentence, AttributionResult, FlagReason, FlaggedSentence, PipelineResult,
    SimilarityResult, TrustMetrics,
};

use super::similarity::cosine_similarity;

/// Decide one sentence's flag. Fixed precedence, first match wins:
/// NO_CITATION → INVALID_CITATION → LOW_SIMILARITY → NONE.
pub fn flag_reason(
    sentence: &AnswerSentence,
    attribution: &AttributionResult,
    similarity: Option<&SimilarityResult>,
    threshold: f32,
) -> FlagReason {
    if sentence.citation_ids.is_empty() {
        return FlagReason::NoCitation;
    }
    if !attribution.is_fully_attributed {
        return FlagReason::InvalidCitation;
    }
    // Similarity is absent only with zero chunks, and then no citation can
    // be fully attributed — this arm is unreachable in that case.
    match similarity {
        Some(s) if s.score < threshold => FlagReason::LowSimilarity,
        _ => FlagReason::None,
    }
}

/// Combine per-sentence verdicts and the query/answer embeddings into the
/// final result. Pure and deterministic: identical inputs and embeddings
/// produce an identical PipelineResult.
pub fn assemble(
    answer_text: &str,
    sentences: Vec<AnswerSentence>,
    attributions: Vec<AttributionResult>,
    similarities: Vec<Option<SimilarityResult>>,
    query_embedding: &[f32],
    answer_embedding: &[f32],
    chunk_count: usize,
    threshold: f32,
) -> PipelineResult {
    let mut flagged_sentences = Vec::with_capacity(sentences.len());
    let mut trusted = 0usize;
    let mut referenced: BTreeSet<u64> = BTreeSet::new();

    for ((sentence, attribution), similarity) in
        sentences.into_iter().zip(attributions).zip(similarities)
    {
        referenced.extend(attribution.valid_ids.iter().copied());

        let reason = flag_reason(&sentence, &attribution, similarity.as_ref(), threshold);
        if reason == FlagReason::None {
            trusted += 1;
        } else {
            metrics::counter!("pipeline.sentences.flagged", "reason" => reason.as_str())
                .increment(1);
        }

        flagged_sentences.push(FlaggedSentence {
            sentence_index: sentence.index,
            text: sentence.text,
            attribution,
            similarity,
            flagged: reason != FlagReason::None,
            reason,
        });
    }

    // Empty answer is vacuously faithful.
    let faithfulness = if flagged_sentences.is_empty() {
        1.0
    } else {
        trusted as f64 / flagged_sentences.len() as f64
    };

    // Single pairwise score between the whole query and the whole answer,
    // clamped into [0, 1] (anti-correlated text reads as zero relevance).
    let answer_relevance =
        f64::from(cosine_similarity(query_embedding, answer_embedding)).clamp(0.0, 1.0);

    let context_precision = if chunk_count == 0 {
        0.0
    } else {
        referenced.len() as f64 / chunk_count as f64
    };

    PipelineResult {
        answer_text: answer_text.to_string(),
        sentences: flagged_sentences,
        metrics: TrustMetrics {
            faithfulness,
            answer_relevance,
            context_precision,
        },
    }
}

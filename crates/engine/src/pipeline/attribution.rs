use std::collections::BTreeSet;

use trustrag_common::types::{AnswerSentence, AttributionResult};

/// Check one sentence's citation ordinals against the retrieved window.
///
/// Valid ordinals are `1..=chunk_count` — the `[Source k]` convention is
/// 1-based retrieval rank. Phantom ordinals stay visible in `cited_ids`
/// but are dropped from `valid_ids`; a single phantom taints the
/// full-attribution flag even when other citations resolve.
pub fn validate_attribution(sentence: &AnswerSentence, chunk_count: usize) -> AttributionResult {
    let cited_ids: BTreeSet<u64> = sentence.citation_ids.iter().copied().collect();
    let valid_ids: BTreeSet<u64> = cited_ids
        .iter()
        .copied()
        .filter(|&k| k >= 1 && k <= chunk_count as u64)
        .collect();

    let is_fully_attributed =
        !sentence.citation_ids.is_empty() && valid_ids.len() == cited_ids.len();

    AttributionResult {
        sentence_index: sentence.index,
        cited_ids,
        valid_ids,
        is_fully_attributed,
    }
}

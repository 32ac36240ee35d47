use trustrag_common::types::{SimilarityResult, SourceChunk};

pub fn l2_norm(v: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for x in v {
        sum += x * x;
    }
    sum.sqrt()
}

/// Cosine similarity with a 0.0 fallback when either vector has zero norm
/// (degenerate/empty text). Never divides by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let a_norm = l2_norm(a);
    let b_norm = l2_norm(b);
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
    }
    dot / (a_norm * b_norm)
}

/// Find the retrieved chunk best supporting one sentence.
///
/// `score` is the max cosine over all chunks; ties go to the lowest
/// retrieval rank (strict `>` while scanning in rank order). Returns None
/// only when nothing was retrieved — the raw score is reported as-is, the
/// hallucination threshold is aggregation's business.
pub fn best_match(
    sentence_index: usize,
    sentence_embedding: &[f32],
    chunks: &[SourceChunk],
    chunk_embeddings: &[Vec<f32>],
) -> Option<SimilarityResult> {
    if chunks.is_empty() {
        return None;
    }

    let mut best_rank = 0;
    let mut best_score = f32::NEG_INFINITY;
    for (rank, embedding) in chunk_embeddings.iter().enumerate() {
        let score = cosine_similarity(sentence_embedding, embedding);
        if score > best_score {
            best_score = score;
            best_rank = rank;
        }
    }

    Some(SimilarityResult {
        sentence_index,
        best_match_chunk_id: Some(chunks[best_rank].id),
        score: best_score,
    })
}

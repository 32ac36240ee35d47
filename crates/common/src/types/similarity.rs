use serde::{Deserialize, Serialize};

use crate::ids::ChunkId;

/// Semantic-support verdict for one sentence.
///
/// `score` is the maximum cosine similarity between the sentence embedding
/// and any retrieved chunk's embedding, in [-1, 1]. `best_match_chunk_id`
/// is the chunk achieving that max; ties go to the lowest retrieval rank.
/// Absent entirely when zero chunks were retrieved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub sentence_index: usize,
    pub best_match_chunk_id: Option<ChunkId>,
    pub score: f32,
}

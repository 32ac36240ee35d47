use serde::{Deserialize, Serialize};

use crate::ids::{ChunkId, DocumentId};

/// One retrieved context passage.
///
/// Produced by the (external) retriever in ranked order; the 1-based rank
/// is what `[Source k]` markers in the generated answer refer to. Immutable
/// for the lifetime of one evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    pub id: ChunkId,
    pub text: String,
    /// The document this chunk was cut from during ingestion.
    pub origin_document: DocumentId,
}

impl SourceChunk {
    pub fn new(text: String, origin_document: DocumentId) -> Self {
        Self {
            id: ChunkId::new(),
            text,
            origin_document,
        }
    }
}

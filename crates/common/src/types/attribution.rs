use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Attribution verdict for one sentence.
///
/// `cited_ids` may contain phantom ordinals the retriever never produced;
/// `valid_ids` is always a subset of the actually-retrieved rank window
/// `[1, chunk_count]`. BTreeSet keeps serialization order deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub sentence_index: usize,
    pub cited_ids: BTreeSet<u64>,
    pub valid_ids: BTreeSet<u64>,
    /// True iff the sentence has at least one citation and every one of
    /// them resolves. A single phantom citation taints the whole sentence.
    pub is_fully_attributed: bool,
}

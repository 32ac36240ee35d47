use serde::{Deserialize, Serialize};

/// One sentence of the generated answer, as cut by the citation parser.
///
/// `citation_ids` holds the ordinals scanned from `[Source k]` markers, in
/// order of appearance with duplicates preserved. Empty means the sentence
/// carried no markers at all — distinct from markers that later fail
/// validation. Ordinals are 1-based retrieval ranks, not chunk ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSentence {
    /// Position of this sentence within the answer, 0-based.
    pub index: usize,
    pub text: String,
    pub citation_ids: Vec<u64>,
}

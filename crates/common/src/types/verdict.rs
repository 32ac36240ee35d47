use serde::{Deserialize, Serialize};

use super::{AttributionResult, SimilarityResult};

/// Why a sentence was (or was not) flagged.
///
/// Evaluated in a fixed precedence order; the first matching reason wins,
/// so a sentence is never double-flagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    /// The sentence carries no citation markers at all.
    NoCitation,
    /// Markers exist but at least one fails to resolve to a retrieved chunk.
    InvalidCitation,
    /// Fully attributed, but best-match similarity fell below the threshold.
    LowSimilarity,
    /// Trustworthy — attributed and semantically supported.
    None,
}

impl FlagReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCitation => "no_citation",
            Self::InvalidCitation => "invalid_citation",
            Self::LowSimilarity => "low_similarity",
            Self::None => "none",
        }
    }
}

/// A sentence with its full per-sentence verdict attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedSentence {
    pub sentence_index: usize,
    pub text: String,
    pub attribution: AttributionResult,
    /// Absent only when zero chunks were retrieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<SimilarityResult>,
    pub flagged: bool,
    pub reason: FlagReason,
}

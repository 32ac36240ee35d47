use serde::{Deserialize, Serialize};

use super::{FlaggedSentence, TrustMetrics};

/// The complete result handed back to the caller.
///
/// Assembled once per request and never mutated afterwards. Carries no
/// persistent identity — any logging or storage is the caller's concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub answer_text: String,
    pub sentences: Vec<FlaggedSentence>,
    pub metrics: TrustMetrics,
}

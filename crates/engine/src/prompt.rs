use trustrag_common::types::SourceChunk;

/// System prompt handed to the (external) generator. The `[Source k]`
/// convention the citation parser expects is defined here and nowhere else.
pub const ANSWER_SYSTEM_PROMPT: &str = "\
You are a trustworthy assistant. Answer the user's question using ONLY the \
provided context passages, each labeled [Source k].

Rules:
1. Use only the provided context.
2. If the answer is not in the context, say you cannot answer from the \
provided documents.
3. Cite the source label for every sentence you write, in the form [Source k].
4. If you are unsure, say so rather than guessing.";

/// Render retrieved chunks as labeled context blocks.
///
/// Labels are the 1-based retrieval rank — the same window the attribution
/// validator checks citations against.
pub fn format_context(chunks: &[SourceChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Source {}] (doc {}): {}", i + 1, chunk.origin_document, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

use std::sync::OnceLock;

use regex::Regex;

use trustrag_common::types::AnswerSentence;

/// Sentence boundary seam. The default rule is deliberately simple; callers
/// who need smarter segmentation plug in their own implementation.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Deterministic, locale-agnostic splitter: a sentence ends at terminal
/// punctuation (`.` `!` `?`) followed by whitespace or end of string.
/// Abbreviations ("Mr. Smith") split early; callers who care plug in a
/// smarter SentenceSplitter.
pub struct TerminalPunctuationSplitter;

impl SentenceSplitter for TerminalPunctuationSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if matches!(c, '.' | '!' | '?') {
                let boundary = match chars.peek() {
                    Some((_, next)) => next.is_whitespace(),
                    None => true,
                };
                if boundary {
                    let end = i + c.len_utf8();
                    let piece = text[start..end].trim();
                    if !piece.is_empty() {
                        sentences.push(piece.to_string());
                    }
                    start = end;
                }
            }
        }

        // Trailing text without terminal punctuation still counts.
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }
}

fn citation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 1-based ordinal, case-insensitive on "source", whitespace-tolerant
    // inside the brackets. Anything else ([Source], [Source abc]) simply
    // fails to match and is treated as absent.
    RE.get_or_init(|| Regex::new(r"(?i)\[\s*source\s+(\d+)\s*\]").expect("citation regex"))
}

/// Cut the raw answer into sentences and scan each for `[Source k]` markers.
///
/// Markers are collected in order of appearance with duplicates preserved.
/// Ordinals too large for u64 are treated like any other malformed marker
/// and skipped. Never fails: a garbage answer yields sentences with empty
/// `citation_ids`, which downstream flags rather than errors.
pub fn parse_answer(answer: &str, splitter: &dyn SentenceSplitter) -> Vec<AnswerSentence> {
    splitter
        .split(answer)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let citation_ids = citation_regex()
                .captures_iter(&text)
                .filter_map(|cap| cap[1].parse::<u64>().ok())
                .collect();
            AnswerSentence {
                index,
                text,
                citation_ids,
            }
        })
        .collect()
}

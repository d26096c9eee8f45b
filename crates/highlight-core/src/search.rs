//! Query matching over document text.
//!
//! All offsets in this module are **character offsets** (Unicode scalar
//! values), not byte offsets; conversion to and from the `regex` crate's byte
//! offsets goes through [`CharIndex`]. The per-string matchers are pure
//! functions over `&str`, kept separate from the document walk so they can be
//! tested without a tree.
//!
//! Mode selection per query (first applicable wins):
//!
//! 1. **regex** — the query compiles as a pattern, executed with global
//!    (non-overlapping) semantics; the other flags are ignored.
//! 2. **exact/plain** — case-insensitive literal substring search with the
//!    scan cursor advanced by one character after each hit, so overlapping
//!    occurrences of repeated-character queries are all reported.
//! 3. **morphology** — Cyrillic word-level matching via
//!    [`words_match`](crate::morphology::words_match); falls back to plain
//!    search when the query has no Cyrillic letters.

use crate::dom::{Document, NodeId};
use crate::morphology::words_match;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Options that control how a search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// Case-insensitive literal substring search, ignoring morphology.
    pub exact_match: bool,
    /// Approximate matching of Russian inflected forms (ignored when
    /// `exact_match` is set).
    pub use_morphology: bool,
    /// Treat the query as a regular expression (ignores the other flags).
    pub use_regex: bool,
}

/// Search errors.
#[derive(Debug)]
pub enum SearchError {
    /// The query failed to compile as a regular expression.
    InvalidRegex(regex::Error),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegex(err) => write!(f, "Invalid regex: {}", err),
        }
    }
}

impl std::error::Error for SearchError {}

/// A half-open character range `[start, end)` within one text snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl TextSpan {
    /// Length of the span in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn overlaps(&self, other: &TextSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One located occurrence of the query, before rendering.
///
/// `text` is a snapshot of the owning node's content at scan time; `span`
/// offsets index into that snapshot and satisfy
/// `span.end <= text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Text node the occurrence was found in.
    pub node: NodeId,
    /// Character range of the occurrence within `text`.
    pub span: TextSpan,
    /// Snapshot of the node's text at scan time.
    pub text: String,
}

/// Byte/char offset translation for one string.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .cloned()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    pub(crate) fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn compile_literal(query: &str) -> Result<Regex, SearchError> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(SearchError::InvalidRegex)
}

/// Cyrillic letter runs; `а-я` plus `ё`, either case.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("[а-яё]+")
        .case_insensitive(true)
        .build()
        .expect("word pattern is valid")
});

/// Letter test used for whole-word boundaries (Cyrillic or ASCII Latin).
fn is_letter(ch: char) -> bool {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    ('а'..='я').contains(&lower) || lower == 'ё' || lower.is_ascii_alphabetic()
}

/// Case-insensitive literal occurrences with the cursor advanced by one
/// character after each hit (overlapping occurrences are all reported).
pub fn plain_spans(text: &str, query: &str) -> Vec<TextSpan> {
    match compile_literal(query) {
        Ok(re) => literal_spans(text, &re),
        Err(_) => Vec::new(),
    }
}

fn literal_spans(text: &str, re: &Regex) -> Vec<TextSpan> {
    let index = CharIndex::new(text);
    let mut spans = Vec::new();
    let mut from_char = 0usize;

    while let Some(m) = re.find_at(text, index.char_to_byte(from_char)) {
        let span = TextSpan {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        };
        if span.is_empty() {
            break;
        }
        spans.push(span);
        from_char = span.start + 1;
        if from_char > index.char_count() {
            break;
        }
    }

    spans
}

/// Non-overlapping matches of a compiled pattern, global-flag semantics.
/// A zero-length match advances the scan position by one character.
pub fn regex_spans(text: &str, pattern: &Regex) -> Vec<TextSpan> {
    let index = CharIndex::new(text);
    let mut spans = Vec::new();
    let mut from_char = 0usize;

    while from_char <= index.char_count() {
        let Some(m) = pattern.find_at(text, index.char_to_byte(from_char)) else {
            break;
        };
        let span = TextSpan {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        };
        if span.is_empty() {
            from_char = span.start + 1;
            continue;
        }
        spans.push(span);
        from_char = span.end;
    }

    spans
}

#[derive(Debug)]
struct WordRun {
    span: TextSpan,
    lower: String,
}

fn word_runs(text: &str, index: &CharIndex) -> Vec<WordRun> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| WordRun {
            span: TextSpan {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            },
            lower: m.as_str().to_lowercase(),
        })
        .collect()
}

fn has_word_boundaries(text: &str, index: &CharIndex, span: TextSpan) -> bool {
    let before = span
        .start
        .checked_sub(1)
        .and_then(|i| index.char_at(text, i));
    let after = index.char_at(text, span.end);
    !before.is_some_and(is_letter) && !after.is_some_and(is_letter)
}

/// Morphology-mode occurrences of `query_words` (lower-cased Cyrillic words)
/// in `text`.
///
/// For each query word, exact whole-word occurrences are claimed first, then
/// the remaining word runs are tested with
/// [`words_match`](crate::morphology::words_match). Claimed spans are shared
/// across query words so the pooled result never overlaps; it is returned
/// sorted by start offset.
pub fn morphology_spans(text: &str, query_words: &[String]) -> Vec<TextSpan> {
    let index = CharIndex::new(text);
    let runs = word_runs(text, &index);
    let mut accepted: Vec<TextSpan> = Vec::new();

    for query_word in query_words {
        // Exact whole-word occurrences take priority over fuzzy ones.
        for run in &runs {
            if run.lower == *query_word
                && has_word_boundaries(text, &index, run.span)
                && !accepted.iter().any(|a| a.overlaps(&run.span))
            {
                accepted.push(run.span);
            }
        }

        for run in &runs {
            if run.lower != *query_word
                && words_match(&run.lower, query_word)
                && has_word_boundaries(text, &index, run.span)
                && !accepted.iter().any(|a| a.overlaps(&run.span))
            {
                accepted.push(run.span);
            }
        }
    }

    accepted.sort_by_key(|span| span.start);
    accepted
}

/// Extract the lower-cased Cyrillic words of a query.
fn query_words(query: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

enum CompiledQuery {
    Regex(Regex),
    Plain(Regex),
    Morphology(Vec<String>),
}

fn compile_query(query: &str, options: SearchOptions) -> Result<CompiledQuery, SearchError> {
    if options.use_regex {
        let re = Regex::new(query).map_err(SearchError::InvalidRegex)?;
        return Ok(CompiledQuery::Regex(re));
    }
    if !options.exact_match && options.use_morphology {
        let words = query_words(query);
        if !words.is_empty() {
            return Ok(CompiledQuery::Morphology(words));
        }
        // No Cyrillic letters in the query: fall back to plain search.
    }
    Ok(CompiledQuery::Plain(compile_literal(query)?))
}

/// Scan the rendered text nodes of `doc` for `query`.
///
/// Returns candidates ordered by document order of their node, then by start
/// offset within the node. Whitespace-only nodes and hidden subtrees are
/// skipped. An empty or whitespace-only query yields an empty set without
/// scanning; an invalid regex is an error.
pub fn find_matches(
    doc: &Document,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<MatchCandidate>, SearchError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let compiled = compile_query(query, options)?;
    let mut matches = Vec::new();

    for node in doc.rendered_text_nodes() {
        let Some(text) = doc.text(node) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }

        let spans = match &compiled {
            CompiledQuery::Regex(re) => regex_spans(text, re),
            CompiledQuery::Plain(re) => literal_spans(text, re),
            CompiledQuery::Morphology(words) => morphology_spans(text, words),
        };

        matches.extend(spans.into_iter().map(|span| MatchCandidate {
            node,
            span,
            text: text.to_string(),
        }));
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pairs: &[(usize, usize)]) -> Vec<TextSpan> {
        pairs
            .iter()
            .map(|&(start, end)| TextSpan { start, end })
            .collect()
    }

    #[test]
    fn plain_is_case_insensitive() {
        assert_eq!(plain_spans("Cat CAT cat", "cat"), spans(&[(0, 3), (4, 7), (8, 11)]));
    }

    #[test]
    fn plain_reports_overlapping_occurrences() {
        // Cursor advances by one after each hit.
        assert_eq!(plain_spans("aaaa", "aa"), spans(&[(0, 2), (1, 3), (2, 4)]));
    }

    #[test]
    fn plain_matches_inside_words() {
        assert_eq!(
            plain_spans("running runner run", "run"),
            spans(&[(0, 3), (8, 11), (15, 18)])
        );
    }

    #[test]
    fn plain_uses_char_offsets() {
        // Multi-byte text: offsets count characters, not bytes.
        assert_eq!(plain_spans("ёж ёж", "ёж"), spans(&[(0, 2), (3, 5)]));
    }

    #[test]
    fn regex_matches_are_non_overlapping() {
        let re = Regex::new("c.t").unwrap();
        assert_eq!(
            regex_spans("cat cot cut", &re),
            spans(&[(0, 3), (4, 7), (8, 11)])
        );
        let re = Regex::new("aa").unwrap();
        assert_eq!(regex_spans("aaaa", &re), spans(&[(0, 2), (2, 4)]));
    }

    #[test]
    fn regex_zero_length_match_advances() {
        let re = Regex::new("x*").unwrap();
        // Must terminate and only report the non-empty runs.
        assert_eq!(regex_spans("axxa", &re), spans(&[(1, 3)]));
    }

    #[test]
    fn morphology_exact_whole_word_claims_first() {
        let found = morphology_spans("дом домой домашний", &["дом".to_string()]);
        // The standalone exact occurrence is always present.
        assert!(found.contains(&TextSpan { start: 0, end: 3 }));
        // `домой` shares the base form `дом`; `домашний` does not.
        assert!(found.contains(&TextSpan { start: 4, end: 9 }));
        assert!(!found.iter().any(|s| s.start == 10));
    }

    #[test]
    fn morphology_rejects_embedded_occurrences() {
        // `дом` inside `домом` is not whole-word; the run `домом` itself is
        // evaluated morphologically instead.
        let found = morphology_spans("домом", &["дом".to_string()]);
        assert_eq!(found, spans(&[(0, 5)]));
    }

    #[test]
    fn morphology_respects_latin_boundaries() {
        // A Latin letter adjacent to the run breaks the word boundary.
        let found = morphology_spans("домx дом", &["дом".to_string()]);
        assert_eq!(found, spans(&[(5, 8)]));
    }

    #[test]
    fn morphology_output_is_sorted_and_non_overlapping() {
        let found = morphology_spans(
            "книга дом книги домой",
            &["дом".to_string(), "книга".to_string()],
        );
        for pair in found.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn find_matches_empty_query_is_empty() {
        let doc = Document::new();
        let found = find_matches(&doc, "   ", SearchOptions::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn find_matches_invalid_regex_is_error() {
        let doc = Document::new();
        let result = find_matches(
            &doc,
            "[unclosed",
            SearchOptions {
                use_regex: true,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(SearchError::InvalidRegex(_))));
    }

    #[test]
    fn find_matches_morphology_falls_back_without_cyrillic() {
        let mut doc = Document::new();
        let t = doc.create_text("running runner run");
        doc.append_child(doc.root(), t);
        let found = find_matches(
            &doc,
            "run",
            SearchOptions {
                use_morphology: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(found.len(), 3);
    }
}

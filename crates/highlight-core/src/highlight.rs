//! Highlight rendering and restoration.
//!
//! The renderer converts a computed match set into marker elements wrapped
//! around the matched substrings, without ever changing the document's
//! concatenated text. The restorer is its exact inverse: every marker is
//! replaced by a plain text node and adjacent text nodes are merged back
//! together, so a search followed by a clear leaves `text_content()`
//! character-for-character identical.

use crate::dom::{Document, NodeId};
use crate::search::{CharIndex, MatchCandidate, TextSpan};

/// Class carried by every highlight marker element.
pub const MARKER_CLASS: &str = "search-highlight";
/// Class added to the marker the navigator considers current.
pub const CURRENT_CLASS: &str = "current";
/// Attribute holding a marker's global match index.
pub const INDEX_ATTR: &str = "data-match-index";

struct NodeGroup<'a> {
    node: NodeId,
    /// Candidates for this node paired with their global match-set index,
    /// ascending by start offset.
    candidates: Vec<(usize, &'a MatchCandidate)>,
}

fn group_by_node(matches: &[MatchCandidate]) -> Vec<NodeGroup<'_>> {
    let mut groups: Vec<NodeGroup<'_>> = Vec::new();
    for (global_index, candidate) in matches.iter().enumerate() {
        match groups.iter_mut().find(|g| g.node == candidate.node) {
            Some(group) => group.candidates.push((global_index, candidate)),
            None => groups.push(NodeGroup {
                node: candidate.node,
                candidates: vec![(global_index, candidate)],
            }),
        }
    }
    groups
}

/// Render `matches` into the document as marker elements.
///
/// Each marker is a `<span class="search-highlight">` carrying its
/// candidate's position in the match set as `data-match-index`, so indices
/// increase strictly in reading order. Within a node, overlapping candidates
/// are resolved by a descending-offset pass: a candidate is rendered only if
/// it ends at or before the previously accepted span's start, so its span can
/// be sliced out without invalidating earlier offsets. Candidates whose node
/// has been detached since scan time are skipped silently.
///
/// Returns the number of markers created (which can be less than
/// `matches.len()` when overlaps or detached nodes drop candidates).
pub fn render_highlights(doc: &mut Document, matches: &[MatchCandidate]) -> usize {
    let mut rendered = 0usize;

    for group in group_by_node(matches) {
        if doc.parent(group.node).is_none() || !doc.is_text(group.node) {
            continue;
        }
        let Some((_, first)) = group.candidates.first() else {
            continue;
        };
        let text = first.text.clone();
        let index = CharIndex::new(&text);

        // Highest start offset first; keep a candidate only if it fits
        // entirely before everything accepted so far.
        let mut accepted: Vec<(usize, TextSpan)> = Vec::new();
        let mut last_start = index.char_count();
        for &(global_index, candidate) in group.candidates.iter().rev() {
            let span = candidate.span;
            if span.end <= last_start {
                accepted.push((global_index, span));
                last_start = span.start;
            }
        }
        accepted.reverse();

        // Build the full segment cover left to right: every character of the
        // snapshot appears exactly once, either in a plain text node or
        // inside a marker.
        let mut replacements: Vec<NodeId> = Vec::new();
        let mut cursor = 0usize;
        for (global_index, span) in accepted {
            if span.start > cursor {
                let plain = slice(&text, &index, cursor, span.start);
                let t = doc.create_text(plain);
                replacements.push(t);
            }
            let content = slice(&text, &index, span.start, span.end);
            let marker = doc.create_element("span");
            doc.add_class(marker, MARKER_CLASS);
            doc.set_attribute(marker, INDEX_ATTR, &global_index.to_string());
            let inner = doc.create_text(content);
            doc.append_child(marker, inner);
            replacements.push(marker);
            rendered += 1;
            cursor = span.end;
        }
        if cursor < index.char_count() {
            let tail = slice(&text, &index, cursor, index.char_count());
            let t = doc.create_text(tail);
            replacements.push(t);
        }

        doc.replace_with_nodes(group.node, &replacements);
    }

    rendered
}

fn slice<'a>(text: &'a str, index: &CharIndex, start: usize, end: usize) -> &'a str {
    &text[index.char_to_byte(start)..index.char_to_byte(end)]
}

/// Remove every highlight marker, restoring the original text structure.
///
/// Each marker is replaced by a text node holding its visible text and the
/// parent is normalized, merging the split text nodes back into one. Safe to
/// call when no markers exist.
pub fn clear_highlights(doc: &mut Document) {
    for marker in doc.elements_with_class(MARKER_CLASS) {
        let Some(parent) = doc.parent(marker) else {
            continue;
        };
        let text = doc.text_content_of(marker);
        let replacement = doc.create_text(&text);
        doc.replace_with_nodes(marker, &[replacement]);
        doc.normalize(parent);
    }
}

/// Find the marker element carrying global index `index`, if it was rendered.
pub fn marker_with_index(doc: &Document, index: usize) -> Option<NodeId> {
    let wanted = index.to_string();
    doc.elements_with_class(MARKER_CLASS)
        .into_iter()
        .find(|&m| doc.attribute(m, INDEX_ATTR) == Some(wanted.as_str()))
}

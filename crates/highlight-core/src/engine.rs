//! Engine state: search, navigation, and restore over one document.
//!
//! One [`SearchEngine`] instance owns the match state for one document
//! context. State is explicit rather than global so several documents (or
//! tests) can run independent engines side by side. Calls run synchronously
//! to completion; the caller is responsible for not overlapping them.

use crate::dom::{Document, ScrollAlign};
use crate::highlight::{
    CURRENT_CLASS, MARKER_CLASS, clear_highlights, marker_with_index, render_highlights,
};
use crate::search::{MatchCandidate, SearchError, SearchOptions, find_matches};

/// Per-document search/highlight state.
///
/// Holds the last computed match set and the current navigation index. Each
/// `search` replaces the state wholesale; `clear` resets it.
#[derive(Debug, Default)]
pub struct SearchEngine {
    matches: Vec<MatchCandidate>,
    current: Option<usize>,
}

impl SearchEngine {
    /// Create an engine with no matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `doc` for `query` and render the results as highlights.
    ///
    /// Any previous highlighting is cleared first, so searches replace each
    /// other rather than accumulate. Returns the number of match candidates
    /// found (an empty or whitespace-only query yields `Ok(0)`). On an
    /// invalid regex the previous highlighting is still cleared, no new
    /// highlighting is performed, and the error is returned.
    pub fn search(
        &mut self,
        doc: &mut Document,
        query: &str,
        options: SearchOptions,
    ) -> Result<usize, SearchError> {
        self.clear(doc);

        let matches = find_matches(doc, query, options)?;
        render_highlights(doc, &matches);
        let count = matches.len();
        self.matches = matches;
        Ok(count)
    }

    /// The last computed match set.
    pub fn matches(&self) -> &[MatchCandidate] {
        &self.matches
    }

    /// Number of matches from the last search.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Current navigation index, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Move the "current match" cursor to `index`.
    ///
    /// The `current` class is removed from whichever marker had it. If
    /// `index` is within `0..match_count()`, the marker carrying that global
    /// index gains the class and a centered scroll request is filed for the
    /// host. An out-of-range index (including negative) leaves the stored
    /// index unchanged.
    pub fn navigate_to(&mut self, doc: &mut Document, index: i64) {
        for marker in doc.elements_with_class(CURRENT_CLASS) {
            if doc.has_class(marker, MARKER_CLASS) {
                doc.remove_class(marker, CURRENT_CLASS);
            }
        }

        if index < 0 || index as usize >= self.matches.len() {
            return;
        }
        let index = index as usize;
        self.current = Some(index);

        // The marker can be missing when overlap resolution dropped this
        // candidate at render time; navigation then only clears the old
        // current marker.
        if let Some(marker) = marker_with_index(doc, index) {
            doc.add_class(marker, CURRENT_CLASS);
            doc.request_scroll(marker, ScrollAlign::Center);
        }
    }

    /// Remove all highlighting from `doc` and reset the engine state.
    ///
    /// Safe to call when nothing is highlighted.
    pub fn clear(&mut self, doc: &mut Document) {
        clear_highlights(doc);
        self.matches.clear();
        self.current = None;
    }
}

#![warn(missing_docs)]
//! Highlight Core - Headless In-Page Search & Highlight Engine
//!
//! # Overview
//!
//! `highlight-core` locates a query inside the text of a document tree and
//! renders the occurrences as reversible highlight markers. It is headless:
//! instead of a browser DOM it operates on its own [`Document`] model, which
//! a host populates (and mirrors mutations back from). Everything runs
//! synchronously on the caller's thread.
//!
//! # Core Features
//!
//! - **Three matching modes**: regex (global semantics), case-insensitive
//!   literal substring (overlapping hits reported), and approximate Russian
//!   morphology (suffix-stripping + loose comparison, whole words only)
//! - **Non-destructive highlighting**: matched substrings are wrapped in
//!   marker elements without changing the document's concatenated text
//! - **Stable navigation**: every rendered marker carries a global index in
//!   reading order; the navigator moves a "current" cursor across them
//! - **Guaranteed restore**: clearing merges the split text nodes back so the
//!   document returns to its pre-search textual form
//!
//! # Quick Start
//!
//! ```rust
//! use highlight_core::{Document, SearchEngine, SearchOptions};
//!
//! let mut doc = Document::new();
//! let text = doc.create_text("the cat sat on the mat");
//! doc.append_child(doc.root(), text);
//!
//! let mut engine = SearchEngine::new();
//! let count = engine.search(&mut doc, "cat", SearchOptions::default()).unwrap();
//! assert_eq!(count, 1);
//!
//! engine.navigate_to(&mut doc, 0);
//! assert_eq!(engine.current_index(), Some(0));
//!
//! engine.clear(&mut doc);
//! assert_eq!(doc.text_content(), "the cat sat on the mat");
//! ```
//!
//! # Module Description
//!
//! - [`dom`] - arena document tree the engine searches and mutates
//! - [`search`] - tokenizer/matcher producing ordered match candidates
//! - [`morphology`] - heuristic Russian inflection comparator
//! - [`highlight`] - marker rendering and restoration
//! - [`engine`] - per-document state tying the pieces together
//!
//! # Limitations
//!
//! The morphology mode is a heuristic approximation, not a lemmatizer: it
//! accepts distinct words sharing a 4-letter prefix and similar length, and
//! its suffix table is intentionally small. Regex execution has no timeout; a
//! pathological pattern blocks the calling thread.

pub mod dom;
pub mod engine;
pub mod highlight;
pub mod morphology;
pub mod search;

pub use dom::{Document, NodeId, ScrollAlign, ScrollRequest};
pub use engine::SearchEngine;
pub use highlight::{CURRENT_CLASS, INDEX_ATTR, MARKER_CLASS};
pub use morphology::{base_form, words_match};
pub use search::{MatchCandidate, SearchError, SearchOptions, TextSpan};

#![warn(missing_docs)]
//! Host message boundary for `highlight-core`.
//!
//! The engine is driven exclusively through a request/response protocol:
//! `search`, `navigate`, `clear`, plus a `ping` liveness probe the host uses
//! to detect whether the engine is loaded in a document. This crate provides
//! the serde wire types ([`Request`]/[`Response`]), a [`SearchService`] that
//! dispatches them against an engine and never lets a failure escape
//! unstructured, and a `Content-Length`-framed [`transport`] whose [`serve`]
//! loop answers framed requests for hosts that talk over a pipe.
//!
//! ```rust
//! use highlight_core::Document;
//! use highlight_core_rpc::SearchService;
//! use serde_json::json;
//!
//! let mut doc = Document::new();
//! let text = doc.create_text("cat cats catalog");
//! doc.append_child(doc.root(), text);
//!
//! let mut service = SearchService::new();
//! let response = service.handle_json(
//!     &mut doc,
//!     json!({ "action": "search", "text": "cat", "exactMatch": true }),
//! );
//! assert_eq!(response, json!({ "success": true, "count": 3 }));
//! ```

pub mod protocol;
pub mod service;
pub mod transport;

pub use protocol::{Request, Response};
pub use service::SearchService;
pub use transport::serve;

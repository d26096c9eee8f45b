//! Request dispatch against one engine/document pair.

use crate::protocol::{Request, Response};
use highlight_core::{Document, SearchEngine, SearchOptions};
use serde_json::{Value, json};

/// Dispatches host requests to a [`SearchEngine`].
///
/// The service owns the engine state for one document context and converts
/// every failure into a structured error response; the host always receives
/// an answer. An `enabled` flag mirrors the extension on/off switch: while
/// disabled, engine requests are refused with an error, but `ping` still
/// succeeds so the host can tell "not injected" from "switched off".
#[derive(Debug, Default)]
pub struct SearchService {
    engine: SearchEngine,
    disabled: bool,
}

impl SearchService {
    /// Create an enabled service with an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the service on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// `true` unless the service has been switched off.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// The engine behind the service (for state inspection).
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Handle one typed request against `doc`.
    pub fn handle(&mut self, doc: &mut Document, request: Request) -> Response {
        match request {
            Request::Ping => Response::ok(),
            _ if self.disabled => Response::err("search is disabled"),
            Request::Search { ref text, .. } => {
                let options = request.search_options().unwrap_or(SearchOptions::default());
                match self.engine.search(doc, text, options) {
                    Ok(count) => Response::with_count(count),
                    Err(err) => Response::err(err.to_string()),
                }
            }
            Request::Navigate { index } => {
                self.engine.navigate_to(doc, index);
                Response::ok()
            }
            Request::Clear => {
                self.engine.clear(doc);
                Response::ok()
            }
        }
    }

    /// Handle one raw JSON request against `doc`.
    ///
    /// Malformed requests become `{ "success": false, "error": ... }` rather
    /// than an `Err`; this is the boundary the host talks to.
    pub fn handle_json(&mut self, doc: &mut Document, request: Value) -> Value {
        let response = match serde_json::from_value::<Request>(request) {
            Ok(request) => self.handle(doc, request),
            Err(err) => Response::err(format!("invalid request: {err}")),
        };
        serde_json::to_value(&response)
            .unwrap_or_else(|_| json!({ "success": false, "error": "unserializable response" }))
    }
}

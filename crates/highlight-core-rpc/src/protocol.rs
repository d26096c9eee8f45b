//! Wire types of the host protocol.
//!
//! Requests arrive as JSON objects tagged by an `action` field with camelCase
//! payload keys, e.g.:
//!
//! ```json
//! { "action": "search", "text": "дом", "exactMatch": false,
//!   "useMorphology": true, "useRegex": false }
//! ```
//!
//! Every request is answered with a [`Response`]: `{ "success": true }`
//! optionally carrying `count`, or `{ "success": false, "error": "..." }`.

use highlight_core::SearchOptions;
use serde::{Deserialize, Serialize};

/// A request from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Liveness probe; succeeds whenever the engine is loaded.
    Ping,
    /// Search the document and highlight the results.
    #[serde(rename_all = "camelCase")]
    Search {
        /// Query text.
        text: String,
        /// Case-insensitive literal substring mode.
        #[serde(default)]
        exact_match: bool,
        /// Approximate Russian morphology mode.
        #[serde(default)]
        use_morphology: bool,
        /// Treat the query as a regular expression.
        #[serde(default)]
        use_regex: bool,
    },
    /// Move the current-match cursor to a global match index.
    Navigate {
        /// Zero-based global match index; out-of-range values are no-ops.
        index: i64,
    },
    /// Remove all highlighting.
    Clear,
}

impl Request {
    /// Search options carried by a `search` request.
    pub fn search_options(&self) -> Option<SearchOptions> {
        match self {
            Request::Search {
                exact_match,
                use_morphology,
                use_regex,
                ..
            } => Some(SearchOptions {
                exact_match: *exact_match,
                use_morphology: *use_morphology,
                use_regex: *use_regex,
            }),
            _ => None,
        }
    }
}

/// A structured response to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// `true` when the request was handled.
    pub success: bool,
    /// Match count, present on successful `search` responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Error description, present when `success` is `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A bare success response.
    pub fn ok() -> Self {
        Self {
            success: true,
            count: None,
            error: None,
        }
    }

    /// A success response carrying a match count.
    pub fn with_count(count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            error: None,
        }
    }

    /// A failure response with an error description.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_uses_camel_case_keys() {
        let json = r#"{
            "action": "search",
            "text": "дом",
            "exactMatch": false,
            "useMorphology": true,
            "useRegex": false
        }"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            Request::Search {
                text: "дом".to_string(),
                exact_match: false,
                use_morphology: true,
                use_regex: false,
            }
        );
    }

    #[test]
    fn search_flags_default_to_false() {
        let request: Request =
            serde_json::from_str(r#"{"action":"search","text":"x"}"#).unwrap();
        assert_eq!(
            request.search_options(),
            Some(SearchOptions::default())
        );
    }

    #[test]
    fn simple_actions_round_trip() {
        for (json, expected) in [
            (r#"{"action":"ping"}"#, Request::Ping),
            (r#"{"action":"navigate","index":3}"#, Request::Navigate { index: 3 }),
            (r#"{"action":"clear"}"#, Request::Clear),
        ] {
            let parsed: Request = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn responses_omit_absent_fields() {
        assert_eq!(
            serde_json::to_string(&Response::ok()).unwrap(),
            r#"{"success":true}"#
        );
        assert_eq!(
            serde_json::to_string(&Response::with_count(5)).unwrap(),
            r#"{"success":true,"count":5}"#
        );
        assert_eq!(
            serde_json::to_string(&Response::err("bad")).unwrap(),
            r#"{"success":false,"error":"bad"}"#
        );
    }
}

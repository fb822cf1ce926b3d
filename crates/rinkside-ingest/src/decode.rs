//! Response decoding: bare JSON or callback-wrapped JSON
//!
//! The upstream API has shipped both plain JSON and JSONP
//! (`someCallback({...});`) over the years, and the callback name has
//! changed more than once. The wrapper is therefore matched by shape
//! only, never by name.

use regex::Regex;
use rinkside_common::{IngestError, Result};
use serde_json::Value;
use std::sync::LazyLock;

/// `<identifier>(<payload>)` with optional trailing semicolon and
/// whitespace. The greedy capture pairs the outermost parentheses, so
/// parentheses inside the payload are unaffected.
#[allow(clippy::expect_used)]
static JSONP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*[A-Za-z_$][A-Za-z0-9_$]*\s*\((.*)\)\s*;?\s*$")
        .expect("jsonp pattern is valid")
});

/// Decode raw upstream text into a JSON value.
///
/// Tries a strict JSON parse first, then the callback-wrapped shape.
/// Anything else is an upstream contract break and fails the run.
pub fn decode(text: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    if let Some(captures) = JSONP_SHAPE.captures(text) {
        if let Some(payload) = captures.get(1) {
            if let Ok(value) = serde_json::from_str(payload.as_str().trim()) {
                return Ok(value);
            }
        }
    }

    let excerpt: String = text.chars().take(120).collect();
    Err(IngestError::Decode(format!(
        "neither JSON nor callback-wrapped JSON: {:?}",
        excerpt
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// Build the `cb(...)` form, as upstream would
    fn wrap(callback: &str, payload: &str) -> String {
        format!("{}({});", callback, payload)
    }

    #[test]
    fn decodes_bare_json() {
        let value = decode(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(value["data"][2], 3);
    }

    #[test]
    fn wrapped_payload_round_trips() {
        let original = serde_json::json!({
            "rows": [["Mon", {"name": "EHC (A)"}]],
            "note": "contains (parens) and \"quotes\""
        });
        let text = wrap("externalStatisticsCallback", &original.to_string());
        assert_eq!(decode(&text).unwrap(), original);
    }

    #[test]
    fn callback_name_is_not_validated() {
        let original = serde_json::json!({"ok": true});
        for name in ["foo", "_cb42", "$jsonp1"] {
            assert_eq!(decode(&wrap(name, &original.to_string())).unwrap(), original);
        }
    }

    #[test]
    fn trailing_semicolon_optional() {
        let value = decode("cb({\"a\":1})  \n").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn garbage_is_a_hard_failure() {
        let err = decode("<html>503 Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn wrapped_garbage_is_a_hard_failure() {
        assert!(decode("cb(not json at all);").is_err());
    }
}

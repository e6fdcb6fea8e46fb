//! JSON output formatting
//!
//! JSON is the machine-readable format, suitable for piping between
//! processes.

use serde::Serialize;

/// Format a document as pretty-printed JSON.
pub fn format_json<T: Serialize>(doc: &T) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|e| {
        format!(
            r#"{{"error": true, "code": "SERIALIZATION_ERROR", "message": "{}"}}"#,
            e
        )
    })
}

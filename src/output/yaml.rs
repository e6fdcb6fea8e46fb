//! YAML output formatting

use serde::Serialize;

/// Format a document as YAML.
pub fn format_yaml<T: Serialize>(doc: &T) -> String {
    serde_yaml::to_string(doc).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_yaml() {
        let out = format_yaml(&json!({
            "patterns": [{"value": "^hello", "compile": true}]
        }));
        assert!(out.contains("patterns:"));
        assert!(out.contains("value: ^hello"));
        assert!(out.contains("compile: true"));
    }
}

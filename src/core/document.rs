//! Document model and reference resolution
//!
//! A document declares optional reference lists (shared option sets, pattern
//! strings, subject strings) and an ordered sequence of patterns, each with
//! zero or more executions. Any value-or-index field holds either a literal
//! or an integer index into the matching reference list, so large repeated
//! strings are declared once and referenced everywhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A set of PCRE option names: either a single string (possibly holding
/// several `|`-separated names) or a list of such strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSet {
    One(String),
    Many(Vec<String>),
}

impl OptionSet {
    /// The empty option set.
    pub fn empty() -> Self {
        OptionSet::Many(Vec::new())
    }

    /// Iterate over the raw strings, whether one or many.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            OptionSet::One(s) => std::slice::from_ref(s),
            OptionSet::Many(v) => v.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

/// Either a literal value or an integer index into a document reference list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueOrRef<T> {
    Index(usize),
    Value(T),
}

/// Failure to resolve a value-or-index field.
///
/// The two variants are deliberately distinct: a missing field and a dangling
/// reference index are different document defects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("missing key: {key}")]
    MissingKey { key: &'static str },

    #[error("index {index} for key {key} is out of range (reference list holds {len} entries)")]
    IndexOutOfRange {
        key: &'static str,
        index: usize,
        len: usize,
    },
}

/// Resolve a value-or-index field against its reference list.
///
/// Literals are returned verbatim; integers index into `refs`. A `None`
/// field or an out-of-range index is an error; use [`resolve_or`] to fall
/// back to a default instead.
pub fn resolve<'a, T>(
    field: Option<&'a ValueOrRef<T>>,
    refs: &'a [T],
    key: &'static str,
) -> Result<&'a T, ResolveError> {
    match field {
        None => Err(ResolveError::MissingKey { key }),
        Some(ValueOrRef::Value(value)) => Ok(value),
        Some(ValueOrRef::Index(index)) => {
            refs.get(*index).ok_or(ResolveError::IndexOutOfRange {
                key,
                index: *index,
                len: refs.len(),
            })
        }
    }
}

/// Like [`resolve`], but fall back to `default` when the field is missing or
/// the index is out of range.
pub fn resolve_or<'a, T>(
    field: Option<&'a ValueOrRef<T>>,
    refs: &'a [T],
    key: &'static str,
    default: &'a T,
) -> &'a T {
    resolve(field, refs, key).unwrap_or(default)
}

/// Numbered and named captures for one successful execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureSet {
    /// Capture index 0 is the whole match.
    pub by_index: Vec<String>,
    /// Named captures; a name whose group was out of reach for the matched
    /// alternative maps to null.
    pub by_name: BTreeMap<String, Option<String>>,
}

/// Capture outcome of an execution: a capture set on match, `{}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Captures {
    Set(CaptureSet),
    Empty(Map<String, Value>),
}

impl Captures {
    /// The empty capture outcome, serialized as `{}`.
    pub fn empty() -> Self {
        Captures::Empty(Map::new())
    }

    pub fn as_set(&self) -> Option<&CaptureSet> {
        match self {
            Captures::Set(set) => Some(set),
            Captures::Empty(_) => None,
        }
    }
}

/// Compile error details, null/null when compilation succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternError {
    #[serde(default)]
    pub message: Option<String>,
    /// Offset in encoded bytes, as reported by the engine.
    #[serde(default)]
    pub offset: Option<i64>,
}

/// One match attempt against a compiled pattern.
///
/// `match` and `captures` are injected by processing; they stay absent when
/// the owning pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub subject: ValueOrRef<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ValueOrRef<OptionSet>>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captures: Option<Captures>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A regular expression, its compile options and its match attempts.
///
/// Field declaration order keeps the processing results (`compile`, `error`)
/// ahead of the `execute` list in serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub value: ValueOrRef<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ValueOrRef<OptionSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PatternError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute: Option<Vec<Execution>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root container: reference lists plus the ordered pattern sequence.
/// Unknown keys (e.g. `meta`) survive processing untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_options: Vec<OptionSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub execute_options: Vec<OptionSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_strings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_strings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Pattern>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_literal_and_index() {
        let refs = vec!["foo".to_string(), "bar".to_string(), "baz".to_string()];
        let literal = ValueOrRef::Value("real_value!".to_string());
        let index = ValueOrRef::Index(2);
        assert_eq!(
            resolve(Some(&literal), &refs, "value").unwrap(),
            "real_value!"
        );
        assert_eq!(resolve(Some(&index), &refs, "value").unwrap(), "baz");
    }

    #[test]
    fn test_resolve_failures_are_distinct() {
        let refs = vec!["foo".to_string()];
        let dangling: ValueOrRef<String> = ValueOrRef::Index(3);
        assert_eq!(
            resolve(None::<&ValueOrRef<String>>, &refs, "subject"),
            Err(ResolveError::MissingKey { key: "subject" })
        );
        assert_eq!(
            resolve(Some(&dangling), &refs, "subject"),
            Err(ResolveError::IndexOutOfRange {
                key: "subject",
                index: 3,
                len: 1
            })
        );
    }

    #[test]
    fn test_resolve_or_defaults_both_failure_kinds() {
        let refs = vec!["foo".to_string()];
        let default = "default!".to_string();
        let dangling: ValueOrRef<String> = ValueOrRef::Index(3);
        assert_eq!(resolve_or(None, &refs, "k", &default), "default!");
        assert_eq!(resolve_or(Some(&dangling), &refs, "k", &default), "default!");
        let literal = ValueOrRef::Value("bar".to_string());
        assert_eq!(resolve_or(Some(&literal), &refs, "k", &default), "bar");
    }

    #[test]
    fn test_document_deserialization() {
        let doc: Document = serde_json::from_value(json!({
            "compile_options": ["caseless", ["PCRE_ANCHORED", "PCRE_CASELESS"]],
            "pattern_strings": ["^hello"],
            "patterns": [
                {"value": 0, "options": 1, "execute": [{"subject": "Hello!"}]},
                {"value": "^(?:quack)+$", "options": "caseless"}
            ],
            "meta": 42
        }))
        .unwrap();
        assert_eq!(doc.compile_options.len(), 2);
        assert_eq!(doc.patterns[0].value, ValueOrRef::Index(0));
        assert_eq!(
            doc.patterns[1].value,
            ValueOrRef::Value("^(?:quack)+$".to_string())
        );
        assert_eq!(
            doc.patterns[1].options,
            Some(ValueOrRef::Value(OptionSet::One("caseless".to_string())))
        );
        assert_eq!(doc.extra.get("meta"), Some(&json!(42)));
        // Result fields are absent until the document is processed.
        assert!(doc.patterns[0].compile.is_none());
        assert!(doc.patterns[0].execute.as_ref().unwrap()[0].matched.is_none());
    }

    #[test]
    fn test_no_patterns_serializes_empty() {
        let doc = Document::default();
        assert_eq!(serde_json::to_string(&doc).unwrap(), "{}");
    }

    #[test]
    fn test_result_key_order() {
        let pattern = Pattern {
            value: ValueOrRef::Value("^hello".to_string()),
            options: None,
            compile: Some(true),
            error: Some(PatternError::default()),
            execute: Some(vec![Execution {
                subject: ValueOrRef::Value("hello".to_string()),
                options: None,
                matched: None,
                captures: None,
                extra: Map::new(),
            }]),
            extra: Map::new(),
        };
        let out = serde_json::to_string(&pattern).unwrap();
        let compile_at = out.find("\"compile\"").unwrap();
        let error_at = out.find("\"error\"").unwrap();
        let execute_at = out.find("\"execute\"").unwrap();
        assert!(compile_at < error_at && error_at < execute_at);
    }

    #[test]
    fn test_empty_captures_serialize_as_empty_object() {
        assert_eq!(serde_json::to_string(&Captures::empty()).unwrap(), "{}");
        let parsed: Captures = serde_json::from_str("{}").unwrap();
        assert!(parsed.as_set().is_none());
        let set: Captures =
            serde_json::from_value(json!({"by_index": ["x"], "by_name": {}})).unwrap();
        assert_eq!(set.as_set().unwrap().by_index, vec!["x".to_string()]);
    }

    #[test]
    fn test_match_key_rename() {
        let exe: Execution =
            serde_json::from_value(json!({"subject": "s", "match": true, "captures": {}}))
                .unwrap();
        assert_eq!(exe.matched, Some(true));
        let out = serde_json::to_string(&exe).unwrap();
        assert!(out.contains("\"match\":true"));
    }
}

//! Document processing
//!
//! Walks a document pattern by pattern: resolves references, folds options
//! into bitmasks, drives the engine's compile/execute/free lifecycle and
//! writes the results back into the document. Compile and match failures are
//! data, recorded inside the document; only engine load failures and
//! unresolved references abort the whole run.

use thiserror::Error;

use super::document::{
    resolve, Captures, Document, OptionSet, PatternError, ResolveError, ValueOrRef,
};
use super::options::{extract_option_values, or_options};
use super::pcre::{PcreError, PcreLibrary};

/// Fatal processing failure: a dangling reference or an engine error other
/// than a per-pattern compile failure.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Pcre(#[from] PcreError),
}

fn resolve_options(
    field: &Option<ValueOrRef<OptionSet>>,
    refs: &[OptionSet],
) -> Result<OptionSet, ResolveError> {
    // A missing options field means no options; a dangling reference index
    // is a document defect and aborts the run.
    match field {
        None => Ok(OptionSet::empty()),
        Some(field) => resolve(Some(field), refs, "options").cloned(),
    }
}

/// Process a document in place.
///
/// Each pattern gains `compile` and `error` fields; each execution of a
/// successfully compiled pattern gains `match` and `captures`. Executions of
/// a pattern that failed to compile are left untouched. A document without
/// patterns is a no-op.
pub fn process(doc: &mut Document, lib: &PcreLibrary) -> Result<(), ProcessError> {
    for pattern in doc.patterns.iter_mut() {
        // Compilation phase. Result fields are set up front; declaration
        // order keeps them ahead of the execute list in the output.
        pattern.compile = Some(true);
        pattern.error = Some(PatternError::default());

        let value = resolve(Some(&pattern.value), &doc.pattern_strings, "value")?.clone();
        let options = resolve_options(&pattern.options, &doc.compile_options)?;
        let bitmask = or_options(extract_option_values(&options), 0);

        let code = match lib.compile(&value, bitmask) {
            Ok(code) => code,
            Err(PcreError::Compile {
                message, offset, ..
            }) => {
                pattern.compile = Some(false);
                pattern.error = Some(PatternError {
                    message: Some(message),
                    offset: Some(offset),
                });
                // Executions of a failed pattern stay untouched.
                continue;
            }
            Err(other) => return Err(other.into()),
        };

        // Execution phase, strictly in document order.
        if let Some(execute) = pattern.execute.as_mut() {
            for exe in execute.iter_mut() {
                let subject = resolve(Some(&exe.subject), &doc.subject_strings, "subject")?.clone();
                let options = resolve_options(&exe.options, &doc.execute_options)?;
                let bitmask = or_options(extract_option_values(&options), 0);
                let result = lib.exec(&code, &subject, bitmask)?;
                exe.matched = Some(result.is_some());
                exe.captures = Some(match result {
                    Some(set) => Captures::Set(set),
                    None => Captures::empty(),
                });
            }
        }
        // `code` goes out of scope here, freeing the engine allocation for
        // this pattern exactly once.
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn try_library() -> Option<PcreLibrary> {
        let lib = PcreLibrary::new();
        match lib.version() {
            Ok(_) => Some(lib),
            Err(err) => {
                eprintln!("skipping: {err}");
                None
            }
        }
    }

    fn assert_compiled(doc: &Document, pattern: usize) {
        let pattern = &doc.patterns[pattern];
        assert_eq!(pattern.compile, Some(true));
        let error = pattern.error.as_ref().unwrap();
        assert_eq!(error.message, None);
        assert_eq!(error.offset, None);
    }

    fn assert_matched(doc: &Document, pattern: usize, exe: usize, expected: bool) {
        let exe = &doc.patterns[pattern].execute.as_ref().unwrap()[exe];
        assert_eq!(exe.matched, Some(expected));
        let captures = exe.captures.as_ref().unwrap();
        assert_eq!(captures.as_set().is_some(), expected);
    }

    #[test]
    fn test_empty_document_is_noop() {
        let lib = PcreLibrary::new().with_soname("libpcre-definitely-not-here.so");
        let mut doc = Document::default();
        // No patterns: the engine is never even loaded.
        process(&mut doc, &lib).unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), "{}");
    }

    #[test]
    fn test_process_with_references() {
        let Some(lib) = try_library() else { return };
        let mut doc: Document = serde_json::from_value(json!({
            "compile_options": [
                "PCRE_CASELESS",
                "PCRE_ANCHORED",
                ["PCRE_CASELESS", "PCRE_ANCHORED"]
            ],
            "execute_options": ["no_utf8_check|no_start_optimise"],
            "pattern_strings": [
                "^",
                "^/(?<prefix>[^/]+)/(?<animal>cat|dog|cow)(?<tail>.*)"
            ],
            "subject_strings": ["hello", "/foo/cat/tail", "/bar/dog/tail", "moo"],
            "patterns": [
                {
                    "value": 0,
                    "options": 0,
                    "execute": [{"subject": 0, "options": 0}]
                },
                {
                    "value": 1,
                    "options": 2,
                    "execute": [
                        {"subject": 1},
                        {"subject": 2},
                        {"subject": 3}
                    ]
                }
            ]
        }))
        .unwrap();
        process(&mut doc, &lib).unwrap();
        assert_compiled(&doc, 0);
        assert_compiled(&doc, 1);
        assert_matched(&doc, 0, 0, true);
        assert_matched(&doc, 1, 0, true);
        assert_matched(&doc, 1, 1, true);
        assert_matched(&doc, 1, 2, false);

        let captures = doc.patterns[1].execute.as_ref().unwrap()[0]
            .captures
            .as_ref()
            .unwrap()
            .as_set()
            .unwrap();
        assert_eq!(captures.by_index, vec!["/foo/cat/tail", "foo", "cat", "/tail"]);
        assert_eq!(captures.by_name["animal"], Some("cat".to_string()));
    }

    #[test]
    fn test_process_quacks() {
        let Some(lib) = try_library() else { return };
        let mut doc: Document = serde_json::from_value(json!({
            "patterns": [{
                "value": "^(?:quack)+$",
                "options": "caseless",
                "execute": [
                    {"subject": "quack", "options": "no_start_optimise"},
                    {"subject": "QUACK"},
                    {"subject": "quackquack"},
                    {"subject": "QUACKQUACK"},
                    {"subject": "QuAcKqUaCk"}
                ]
            }]
        }))
        .unwrap();
        process(&mut doc, &lib).unwrap();
        assert_compiled(&doc, 0);
        for i in 0..5 {
            assert_matched(&doc, 0, i, true);
        }
    }

    #[test]
    fn test_compile_failure_leaves_executions_untouched() {
        let Some(lib) = try_library() else { return };
        let mut doc: Document = serde_json::from_value(json!({
            "patterns": [
                {
                    "value": "unclosed(group",
                    "execute": [{"subject": "anything"}]
                },
                {
                    "value": "^hello",
                    "execute": [{"subject": "hello world"}]
                }
            ]
        }))
        .unwrap();
        process(&mut doc, &lib).unwrap();

        let failed = &doc.patterns[0];
        assert_eq!(failed.compile, Some(false));
        let error = failed.error.as_ref().unwrap();
        assert!(error.message.is_some());
        assert_eq!(error.offset, Some("unclosed(group".len() as i64));
        let exe = &failed.execute.as_ref().unwrap()[0];
        assert_eq!(exe.matched, None);
        assert_eq!(exe.captures, None);

        // Processing continued with the next pattern.
        assert_compiled(&doc, 1);
        assert_matched(&doc, 1, 0, true);
    }

    #[test]
    fn test_dangling_reference_aborts() {
        let Some(lib) = try_library() else { return };
        let mut doc: Document = serde_json::from_value(json!({
            "subject_strings": ["hello"],
            "patterns": [{
                "value": "^hello",
                "execute": [{"subject": 7}]
            }]
        }))
        .unwrap();
        let err = process(&mut doc, &lib).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Resolve(ResolveError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_dangling_options_reference_aborts() {
        // The reference is resolved before the engine is ever needed.
        let lib = PcreLibrary::new().with_soname("libpcre-definitely-not-here.so");
        let mut doc: Document = serde_json::from_value(json!({
            "patterns": [{"value": "^hello", "options": 4}]
        }))
        .unwrap();
        assert!(matches!(
            process(&mut doc, &lib),
            Err(ProcessError::Resolve(ResolveError::IndexOutOfRange {
                index: 4,
                ..
            }))
        ));
    }
}

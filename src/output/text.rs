//! Human-friendly text output formatting
//!
//! Renders a processed document for terminal consumption, one block per
//! pattern. Missing result fields are simply not printed, so the same
//! renderer works on unprocessed documents.

use std::fmt::Write;

use crate::core::document::{resolve_or, Document, OptionSet};

const INDENT: &str = "  ";

fn render_options(options: &OptionSet) -> String {
    let names: Vec<&str> = options.strings().collect();
    format!("[{}]", names.join(", "))
}

/// Format a processed document as plain text.
pub fn format_document(doc: &Document) -> String {
    let mut out = String::new();
    let empty_subject = String::new();
    let empty_options = OptionSet::empty();

    for (pattern_index, pattern) in doc.patterns.iter().enumerate() {
        let value = resolve_or(
            Some(&pattern.value),
            &doc.pattern_strings,
            "value",
            &empty_subject,
        );
        let options = resolve_or(
            pattern.options.as_ref(),
            &doc.compile_options,
            "options",
            &empty_options,
        );
        let _ = writeln!(out, "Pattern #{}: {}", pattern_index + 1, value);
        let _ = writeln!(out, "{INDENT}Options: {}", render_options(options));
        if let Some(compile) = pattern.compile {
            let _ = writeln!(out, "{INDENT}Compilation: {compile}");
            if !compile {
                if let Some(error) = &pattern.error {
                    let message = error.message.as_deref().unwrap_or("unknown");
                    let _ = writeln!(out, "{INDENT}Error message: {message}");
                    if let Some(offset) = error.offset {
                        let _ = writeln!(out, "{INDENT}Error offset: {offset}");
                    }
                }
                continue;
            }
        }

        for (index, exe) in pattern.execute.iter().flatten().enumerate() {
            let subject = resolve_or(
                Some(&exe.subject),
                &doc.subject_strings,
                "subject",
                &empty_subject,
            );
            let options = resolve_or(
                exe.options.as_ref(),
                &doc.execute_options,
                "options",
                &empty_options,
            );
            let _ = writeln!(out, "{INDENT}Subject #{}: {}", index + 1, subject);
            let _ = writeln!(out, "{INDENT}Options: {}", render_options(options));
            if let Some(matched) = exe.matched {
                let _ = writeln!(out, "{INDENT}{INDENT}Match: {matched}");
            }
            let Some(captures) = exe.captures.as_ref().and_then(|c| c.as_set()) else {
                continue;
            };
            if !captures.by_index.is_empty() {
                let _ = writeln!(out, "{INDENT}{INDENT}Captures by index:");
                for (i, capture) in captures.by_index.iter().enumerate() {
                    let _ = writeln!(out, "{INDENT}{INDENT}{INDENT}[{i}] {capture}");
                }
            }
            if !captures.by_name.is_empty() {
                let _ = writeln!(out, "{INDENT}{INDENT}Captures by name:");
                for (name, capture) in &captures.by_name {
                    let capture = capture.as_deref().unwrap_or("null");
                    let _ = writeln!(out, "{INDENT}{INDENT}{INDENT}[{name}] {capture}");
                }
            }
        }
    }
    out
}

//! Option name extraction and normalisation
//!
//! Turns free-form option strings (`"caseless | PCRE_ANCHORED"`) into
//! canonical `PCRE_*` names and resolved bitmasks. Two modes exist on
//! purpose: strict normalisation silently drops unknown names, permissive
//! value extraction keeps going but warns once per unknown name on stderr.

use super::consts::constant;
use super::document::{Document, OptionSet, ValueOrRef};

/// Extract raw option tokens from an option set.
///
/// Each string may hold several `|`-separated names; tokens are trimmed,
/// empty ones dropped, order and duplicates preserved.
pub fn extract_options(options: &OptionSet) -> impl Iterator<Item = &str> {
    options
        .strings()
        .flat_map(|s| s.split('|'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Assume the given name is a `PCRE_*` constant and normalise it: uppercase,
/// with the `PCRE_` prefix prepended when absent.
pub fn normalise_constant(name: &str) -> String {
    let name = name.to_uppercase();
    if name.starts_with("PCRE_") {
        name
    } else {
        format!("PCRE_{name}")
    }
}

/// Fetch the value of a `PCRE_*` constant from a possibly non-canonical
/// name. `None` if the constant does not exist.
pub fn constant_value(name: &str) -> Option<u32> {
    constant(&normalise_constant(name))
}

/// Normalise an option set into canonical `PCRE_*` names, silently dropping
/// names that resolve to no known constant.
pub fn normalise_options(options: &OptionSet) -> Vec<String> {
    extract_options(options)
        .map(normalise_constant)
        .filter(|name| constant(name).is_some())
        .collect()
}

/// Like [`extract_options`], but yield constant values instead of names.
/// Names that cannot be resolved generate one advisory warning each on
/// stderr and are skipped.
pub fn extract_option_values(options: &OptionSet) -> impl Iterator<Item = u32> + '_ {
    extract_options(options).filter_map(|token| match constant_value(token) {
        Some(value) => Some(value),
        None => {
            eprintln!("Warning: ignoring unknown constant \"{token}\"");
            None
        }
    })
}

/// Combine option values into a single bitmask with binary OR.
pub fn or_options(values: impl IntoIterator<Item = u32>, initial: u32) -> u32 {
    values.into_iter().fold(initial, |acc, value| acc | value)
}

/// Normalise every option set found in a document: the reference lists, and
/// the per-pattern / per-execution fields. Integer fields are reference
/// indices and are left alone.
pub fn normalise_document(doc: &mut Document) {
    for list in [&mut doc.compile_options, &mut doc.execute_options] {
        for set in list.iter_mut() {
            *set = OptionSet::Many(normalise_options(set));
        }
    }
    for pattern in &mut doc.patterns {
        normalise_field(&mut pattern.options);
        if let Some(execute) = &mut pattern.execute {
            for exe in execute {
                normalise_field(&mut exe.options);
            }
        }
    }
}

fn normalise_field(field: &mut Option<ValueOrRef<OptionSet>>) {
    if let Some(ValueOrRef::Value(set)) = field {
        *set = OptionSet::Many(normalise_options(set));
    }
}

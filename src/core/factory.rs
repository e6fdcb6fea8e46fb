//! Convenience builders for common document shapes.

use serde_json::{Map, Value};

use super::document::{Document, Execution, OptionSet, Pattern, ValueOrRef};

fn extra_with_meta(meta: Option<Value>) -> Map<String, Value> {
    let mut extra = Map::new();
    if let Some(meta) = meta {
        extra.insert("meta".to_string(), meta);
    }
    extra
}

fn make_pattern(
    value: &str,
    options: Option<&OptionSet>,
    execute: Option<Vec<Execution>>,
    meta: Option<Value>,
) -> Pattern {
    Pattern {
        value: ValueOrRef::Value(value.to_string()),
        options: options.cloned().map(ValueOrRef::Value),
        compile: None,
        error: None,
        execute,
        extra: extra_with_meta(meta),
    }
}

/// Builds a document that compiles n patterns and matches nothing.
#[derive(Debug, Default)]
pub struct CompileOnlyDocument {
    patterns: Vec<Pattern>,
    meta: Option<Value>,
}

impl CompileOnlyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn add_pattern(&mut self, value: &str, options: Option<&OptionSet>, meta: Option<Value>) {
        self.patterns.push(make_pattern(value, options, None, meta));
    }

    pub fn build(&self) -> Document {
        Document {
            patterns: self.patterns.clone(),
            extra: extra_with_meta(self.meta.clone()),
            ..Document::default()
        }
    }
}

/// Builds a document that matches one subject against n patterns. The
/// subject is declared once in `subject_strings` and referenced by index
/// from every pattern.
#[derive(Debug)]
pub struct OneSubjectDocument {
    subject: String,
    patterns: Vec<Pattern>,
    meta: Option<Value>,
}

impl OneSubjectDocument {
    pub fn new(subject: impl Into<String>) -> Self {
        OneSubjectDocument {
            subject: subject.into(),
            patterns: Vec::new(),
            meta: None,
        }
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn add_pattern(&mut self, value: &str, options: Option<&OptionSet>, meta: Option<Value>) {
        let execute = vec![Execution {
            subject: ValueOrRef::Index(0),
            options: None,
            matched: None,
            captures: None,
            extra: Map::new(),
        }];
        self.patterns
            .push(make_pattern(value, options, Some(execute), meta));
    }

    pub fn build(&self) -> Document {
        Document {
            subject_strings: vec![self.subject.clone()],
            patterns: self.patterns.clone(),
            extra: extra_with_meta(self.meta.clone()),
            ..Document::default()
        }
    }
}

/// Builds a document that matches n subjects against a single pattern.
#[derive(Debug)]
pub struct OnePatternDocument {
    pattern: Pattern,
    meta: Option<Value>,
}

impl OnePatternDocument {
    pub fn new(value: &str, compile_options: Option<&OptionSet>) -> Self {
        OnePatternDocument {
            pattern: make_pattern(value, compile_options, Some(Vec::new()), None),
            meta: None,
        }
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn add_subject(&mut self, subject: &str, options: Option<&OptionSet>, meta: Option<Value>) {
        let execute = self.pattern.execute.get_or_insert_with(Vec::new);
        execute.push(Execution {
            subject: ValueOrRef::Value(subject.to_string()),
            options: options.cloned().map(ValueOrRef::Value),
            matched: None,
            captures: None,
            extra: extra_with_meta(meta),
        });
    }

    pub fn build(&self) -> Document {
        Document {
            patterns: vec![self.pattern.clone()],
            extra: extra_with_meta(self.meta.clone()),
            ..Document::default()
        }
    }
}

//! CLI interface using clap
//!
//! Two modes share one binary: default mode builds a document from pattern
//! and subject arguments, input mode (`--input`) reads a ready-made JSON
//! document from a file or stdin.

use std::fs;
use std::io::Read;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};

use crate::core::document::{Document, Execution, OptionSet, Pattern, ValueOrRef};
use crate::core::options::{extract_options, normalise_document};
use crate::core::{process, PcreLibrary};
use crate::output::{format_document, format_json, format_yaml};

const OPTIONS_HELP: &str = "\
COMPILE_OPTIONS and EXECUTE_OPTIONS format:
- PCRE_* options from pcre.h, e.g. PCRE_NO_AUTO_CAPTURE
- \"PCRE_\" prefix optional, e.g. NO_AUTO_CAPTURE
- case does not matter, e.g. no_auto_capture
- support for multiple options per argument, separated with '|'
  spaces are stripped, leading/trailing pipes do not matter
Examples:
  --compile-options='PCRE_ANCHORED|PCRE_NO_AUTO_CAPTURE'
  --execute-options '| PCRE_NO_UTF8_CHECK | NO_START_OPTIMISE'
  --compile-options caseless anchored no_auto_capture
By default, options are normalised and unknown ones are silently discarded.
However, when option normalisation is disabled, unknown options trigger a
warning on stderr.";

#[derive(Parser)]
#[command(name = "pcredoc")]
#[command(author, version, about = "Evaluate Perl-Compatible Regular Expressions (PCRE)", long_about = None)]
#[command(after_help = OPTIONS_HELP)]
pub struct Cli {
    /// PCRE patterns (at least one, unless --input is used)
    #[arg(required_unless_present = "input", conflicts_with = "input")]
    pub pattern: Vec<String>,

    /// Subjects to match against all patterns
    #[arg(long, short = 'S', num_args = 0..)]
    pub subject: Vec<String>,

    /// Read a YAML/JSON document instead of building one from arguments
    /// ("-" reads stdin)
    #[arg(long, short = 'I', value_name = "DOCUMENT")]
    pub input: Option<String>,

    /// Ignore case; same as (?i) or --compile-options caseless
    #[arg(long, short = 'i', visible_alias = "ignore-case")]
    pub caseless: bool,

    /// Allow duplicate names; same as (?J) or --compile-options dupnames
    #[arg(long, short = 'J')]
    pub dupnames: bool,

    /// Multiline; same as (?m) or --compile-options multiline
    #[arg(long, short = 'm')]
    pub multiline: bool,

    /// Single line / dotall; same as (?s) or --compile-options dotall
    #[arg(long, short = 's', visible_alias = "single-line")]
    pub dotall: bool,

    /// Ungreedy / lazy; same as (?U) or --compile-options ungreedy
    #[arg(long, short = 'u', visible_alias = "lazy")]
    pub ungreedy: bool,

    /// Extended / free-spacing mode; same as (?x) or --compile-options extended
    #[arg(long, short = 'x', visible_alias = "free-spacing")]
    pub extended: bool,

    /// Arbitrary compile options
    #[arg(long, num_args = 0..)]
    pub compile_options: Vec<String>,

    /// Arbitrary execute options
    #[arg(long, num_args = 0..)]
    pub execute_options: Vec<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "text")]
    pub output: OutputFormat,

    /// Do not normalise options
    #[arg(long = "no-norm", action = ArgAction::SetFalse)]
    pub normalise_options: bool,

    /// Engine shared object to load instead of the platform default
    #[arg(long, value_name = "SONAME")]
    pub library: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON, suitable for piping
    Json,
    /// YAML
    Yaml,
    /// Human-readable text (default)
    Text,
}

/// Parse CLI arguments
pub fn parse() -> Cli {
    Cli::parse()
}

/// Collect compile options from the dedicated flags plus the free-form
/// option arguments.
fn compile_options_from_args(args: &Cli) -> OptionSet {
    let flags = [
        (args.caseless, "caseless"),
        (args.dupnames, "dupnames"),
        (args.multiline, "multiline"),
        (args.dotall, "dotall"),
        (args.ungreedy, "ungreedy"),
        (args.extended, "extended"),
    ];
    let mut options: Vec<String> = flags
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| name.to_string())
        .collect();
    let arbitrary = OptionSet::Many(args.compile_options.clone());
    options.extend(extract_options(&arbitrary).map(String::from));
    OptionSet::Many(options)
}

/// Build a brand new document from command-line arguments.
///
/// The collected option sets land in the reference lists and every pattern
/// and execution points at them by index, so the output document shows the
/// options only once.
pub fn document_from_args(args: &Cli) -> Document {
    let execute_options = OptionSet::Many(
        extract_options(&OptionSet::Many(args.execute_options.clone()))
            .map(String::from)
            .collect(),
    );
    let patterns = args
        .pattern
        .iter()
        .map(|pattern| {
            let execute: Vec<Execution> = args
                .subject
                .iter()
                .map(|subject| Execution {
                    subject: ValueOrRef::Value(subject.clone()),
                    options: Some(ValueOrRef::Index(0)),
                    matched: None,
                    captures: None,
                    extra: Default::default(),
                })
                .collect();
            Pattern {
                value: ValueOrRef::Value(pattern.clone()),
                options: Some(ValueOrRef::Index(0)),
                compile: None,
                error: None,
                execute: (!execute.is_empty()).then_some(execute),
                extra: Default::default(),
            }
        })
        .collect();
    Document {
        compile_options: vec![compile_options_from_args(args)],
        execute_options: vec![execute_options],
        patterns,
        ..Document::default()
    }
}

fn read_document(input: &str) -> anyhow::Result<Document> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read document from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read document {input}"))?
    };
    // YAML is a superset of JSON, so one parser accepts both.
    serde_yaml::from_str(&text).with_context(|| "failed to parse document".to_string())
}

/// Run the CLI: build or read a document, process it, format it.
pub fn run(args: &Cli) -> anyhow::Result<String> {
    let mut doc = match &args.input {
        Some(input) => read_document(input)?,
        None => document_from_args(args),
    };
    if args.normalise_options {
        normalise_document(&mut doc);
    }
    let mut lib = PcreLibrary::new();
    if let Some(soname) = &args.library {
        lib = lib.with_soname(soname);
    }
    process(&mut doc, &lib).context("failed to process document")?;
    Ok(match args.output {
        OutputFormat::Json => format_json(&doc),
        OutputFormat::Yaml => format_yaml(&doc),
        OutputFormat::Text => format_document(&doc),
    })
}

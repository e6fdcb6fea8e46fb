//! CLI end-to-end tests
//!
//! Tests that drive the PCRE engine are skipped when no system PCRE library
//! can be loaded.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn pcredoc() -> Command {
    Command::new(assert_cmd::cargo_bin!("pcredoc"))
}

fn pcre_available() -> bool {
    let available = pcredoc::PcreLibrary::new().version().is_ok();
    if !available {
        eprintln!("skipping: no loadable PCRE library");
    }
    available
}

#[test]
fn test_help() {
    pcredoc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPILE_OPTIONS"));
}

#[test]
fn test_version() {
    pcredoc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pcredoc"));
}

#[test]
fn test_pattern_or_input_required() {
    pcredoc()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_default_mode_caseless_match() {
    if !pcre_available() {
        return;
    }
    pcredoc()
        .args(["-i", "^hello", "--subject", "HELLO WORLD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pattern #1: ^hello"))
        .stdout(predicate::str::contains("Compilation: true"))
        .stdout(predicate::str::contains("Match: true"));
}

#[test]
fn test_default_mode_anchored_no_match() {
    if !pcre_available() {
        return;
    }
    pcredoc()
        .args([
            "world",
            "--compile-options",
            "anchored",
            "--subject",
            "hello world",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Match: false"));
}

#[test]
fn test_input_mode_stdin_json() {
    if !pcre_available() {
        return;
    }
    let doc = json!({
        "patterns": [{
            "value": "^(?:quack)+$",
            "options": "caseless",
            "execute": [
                {"subject": "quack"},
                {"subject": "QuAcKqUaCk"},
                {"subject": "moo"}
            ]
        }]
    });
    let output = pcredoc()
        .args(["--input", "-", "--output", "json"])
        .write_stdin(doc.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&output).unwrap();
    let pattern = &doc["patterns"][0];
    assert_eq!(pattern["compile"], json!(true));
    assert_eq!(pattern["error"], json!({"message": null, "offset": null}));
    let execute = pattern["execute"].as_array().unwrap();
    assert_eq!(execute[0]["match"], json!(true));
    assert_eq!(execute[1]["match"], json!(true));
    assert_eq!(execute[2]["match"], json!(false));
    assert_eq!(execute[2]["captures"], json!({}));
}

#[test]
fn test_input_mode_stdin_yaml() {
    if !pcre_available() {
        return;
    }
    let doc = "\
patterns:
  - value: ^hello
    options: caseless
    execute:
      - subject: HELLO WORLD
";
    pcredoc()
        .args(["--input", "-"])
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compilation: true"))
        .stdout(predicate::str::contains("Match: true"));
}

#[test]
fn test_yaml_output() {
    if !pcre_available() {
        return;
    }
    let doc = json!({
        "patterns": [{
            "value": "^hello",
            "execute": [{"subject": "hello"}]
        }]
    });
    pcredoc()
        .args(["--input", "-", "--output", "yaml"])
        .write_stdin(doc.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("compile: true"))
        .stdout(predicate::str::contains("match: true"));
}

#[test]
fn test_input_mode_compile_error() {
    if !pcre_available() {
        return;
    }
    let doc = json!({
        "patterns": [{
            "value": "^hello(",
            "execute": [{"subject": "hello"}]
        }]
    });
    let output = pcredoc()
        .args(["--input", "-", "--output", "json"])
        .write_stdin(doc.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&output).unwrap();
    let pattern = &doc["patterns"][0];
    assert_eq!(pattern["compile"], json!(false));
    assert_eq!(pattern["error"]["offset"], json!(7));
    assert!(pattern["error"]["message"].is_string());
    // The execution of a failed pattern gains no result keys.
    let exe = &pattern["execute"][0];
    assert!(exe.get("match").is_none());
    assert!(exe.get("captures").is_none());
}

#[test]
fn test_input_mode_from_file() {
    if !pcre_available() {
        return;
    }
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"patterns": [{{"value": "^hello", "execute": [{{"subject": "hello"}}]}}]}}"#
    )
    .unwrap();
    pcredoc()
        .args(["--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Match: true"));
}

#[test]
fn test_unknown_option_warns_without_normalisation() {
    if !pcre_available() {
        return;
    }
    let doc = json!({
        "patterns": [{"value": "^hello", "options": "caseless|bogus"}]
    });
    pcredoc()
        .args(["--input", "-", "--no-norm", "--output", "json"])
        .write_stdin(doc.to_string())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: ignoring unknown constant \"bogus\"",
        ));
}

#[test]
fn test_unknown_option_dropped_with_normalisation() {
    if !pcre_available() {
        return;
    }
    let doc = json!({
        "patterns": [{"value": "^hello", "options": "caseless|bogus"}]
    });
    pcredoc()
        .args(["--input", "-", "--output", "json"])
        .write_stdin(doc.to_string())
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());
}

#[test]
fn test_empty_document() {
    pcredoc()
        .args(["--input", "-", "--output", "json"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("{}"));
}

#[test]
fn test_malformed_document_fails() {
    pcredoc()
        .args(["--input", "-"])
        .write_stdin("not a document")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse document"));
}

#[test]
fn test_dangling_reference_fails() {
    // Reference resolution happens before the engine is touched.
    let doc = json!({
        "patterns": [{"value": "^hello", "options": 4}]
    });
    pcredoc()
        .args(["--input", "-", "--no-norm"])
        .write_stdin(doc.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_missing_library_fails() {
    let doc = json!({"patterns": [{"value": "^hello"}]});
    pcredoc()
        .args(["--input", "-", "--library", "libpcre-definitely-not-here.so"])
        .write_stdin(doc.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("pcredoc:"));
}

#[test]
fn test_extproc_round_trip() {
    if !pcre_available() {
        return;
    }
    let doc: pcredoc::Document = serde_json::from_value(json!({
        "patterns": [{
            "value": "^hello",
            "options": "caseless",
            "execute": [{"subject": "HELLO"}]
        }]
    }))
    .unwrap();
    let binary = assert_cmd::cargo_bin!("pcredoc");
    let cmdline: Vec<String> = [
        binary.to_str().unwrap(),
        "--input",
        "-",
        "--no-norm",
        "--output",
        "json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let processed = pcredoc::extproc::run(&doc, Some(&cmdline), None).unwrap();
    assert_eq!(processed.patterns[0].compile, Some(true));
    let exe = &processed.patterns[0].execute.as_ref().unwrap()[0];
    assert_eq!(exe.matched, Some(true));
}

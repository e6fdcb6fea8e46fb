//! Out-of-process document evaluation.
//!
//! The engine binding ultimately hands control to a C library, so a
//! pathological pattern can take down the whole process. These helpers pipe a
//! document through an external `pcredoc` process instead, keeping crashes
//! and runaway matches contained.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::core::Document;

/// Command line used when the caller does not supply one. Normalisation is
/// disabled so the child evaluates exactly the options it was given.
pub const DEFAULT_CMDLINE: [&str; 6] = ["pcredoc", "--input", "-", "--no-norm", "--output", "json"];

#[derive(Error, Debug)]
pub enum ExtProcError {
    #[error("empty command line")]
    EmptyCmdline,

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("i/o with child process failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("child process produced invalid output: {0}")]
    BadOutput(#[from] serde_json::Error),

    #[error("child process failed with {status}")]
    Failed { status: std::process::ExitStatus },

    #[error("child process timed out after {0:?}")]
    TimedOut(Duration),
}

/// Outcome of [`run_simple`]: errors folded into two coarse variants.
#[derive(Debug)]
pub enum Outcome {
    Processed(Document),
    Failed,
    TimedOut,
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<bool, std::io::Error> {
    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// Pipe a document through an external process and return the processed
/// document it prints.
///
/// `cmdline` defaults to [`DEFAULT_CMDLINE`]; the command must read a JSON
/// document on stdin and print the processed document as JSON on stdout.
/// With a `timeout`, a child still running once it elapses is killed and the
/// call returns [`ExtProcError::TimedOut`].
pub fn run(
    doc: &Document,
    cmdline: Option<&[String]>,
    timeout: Option<Duration>,
) -> Result<Document, ExtProcError> {
    let default: Vec<String> = DEFAULT_CMDLINE.iter().map(|s| s.to_string()).collect();
    let cmdline = cmdline.unwrap_or(&default);
    let (program, args) = cmdline.split_first().ok_or(ExtProcError::EmptyCmdline)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| ExtProcError::Spawn {
            program: program.clone(),
            source,
        })?;

    let input = serde_json::to_string(doc)?;
    // Both pipes are pumped on their own threads: a document larger than the
    // pipe buffer would otherwise deadlock against a child that streams
    // output while reading, and a blocked write would run past the timeout.
    // stdin is dropped once written so the child sees EOF. A child that
    // exits without draining its input shows up in its exit status, not as
    // a broken pipe here.
    let mut stdin = child.stdin.take();
    let writer = thread::spawn(move || {
        if let Some(stdin) = stdin.as_mut() {
            let _ = stdin.write_all(input.as_bytes());
        }
    });

    let stdout = child.stdout.take();
    let reader = thread::spawn(move || -> Result<Vec<u8>, std::io::Error> {
        match stdout {
            Some(mut stdout) => {
                let mut buf = Vec::new();
                std::io::Read::read_to_end(&mut stdout, &mut buf)?;
                Ok(buf)
            }
            None => Ok(Vec::new()),
        }
    });

    if let Some(timeout) = timeout {
        if !wait_with_timeout(&mut child, timeout)? {
            child.kill()?;
            child.wait()?;
            return Err(ExtProcError::TimedOut(timeout));
        }
    }
    let status = child.wait()?;
    let _ = writer.join();

    let output = reader
        .join()
        .unwrap_or_else(|_| Ok(Vec::new()))
        .map_err(ExtProcError::Io)?;
    if !status.success() {
        return Err(ExtProcError::Failed { status });
    }
    Ok(serde_json::from_slice(&output)?)
}

/// Like [`run`], but fold failures and timeouts into [`Outcome`] variants
/// instead of returning errors.
pub fn run_simple(doc: &Document, cmdline: Option<&[String]>, timeout: Option<Duration>) -> Outcome {
    match run(doc, cmdline, timeout) {
        Ok(doc) => Outcome::Processed(doc),
        Err(ExtProcError::TimedOut(_)) => Outcome::TimedOut,
        Err(_) => Outcome::Failed,
    }
}

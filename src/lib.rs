//! pcredoc - declarative PCRE evaluation
//!
//! Documents describe patterns to compile and subjects to match; processing
//! fills in compilation results, match outcomes and captures in place. The
//! engine is the system PCRE library, loaded at runtime.

pub mod cli;
pub mod core;
pub mod extproc;
pub mod output;

pub use crate::core::{process, Document, PcreLibrary};

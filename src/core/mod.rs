//! Document evaluation core: the engine binding, the document model and the
//! processing pipeline that connects them.

pub mod consts;
pub mod document;
pub mod factory;
pub mod options;
pub mod pcre;
pub mod process;

pub use document::{Captures, Document, Execution, OptionSet, Pattern, ValueOrRef};
pub use pcre::{PcreError, PcreLibrary};
pub use process::{process, ProcessError};

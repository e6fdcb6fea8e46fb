//! Output formatting for processed documents: JSON for pipes, YAML for
//! humans who want structure, plain text for everyone else.

pub mod json;
pub mod text;
pub mod yaml;

pub use json::format_json;
pub use text::format_document;
pub use yaml::format_yaml;

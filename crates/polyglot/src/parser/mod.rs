//! Template and message file parsing.
//!
//! This module parses message templates into an AST for the interpolator, and
//! decodes message files (JSON, TOML, YAML) into message records.

pub mod ast;
pub mod error;
mod file;
mod template;

pub use ast::*;
pub use error::ParseError;
pub use file::{
    UnmarshalFn, builtin_formats, file_format, file_language, parse_messages, unmarshal_json,
};
#[cfg(feature = "toml")]
pub use file::unmarshal_toml;
#[cfg(feature = "yaml")]
pub use file::unmarshal_yaml;
pub use template::{Delimiters, parse_template};

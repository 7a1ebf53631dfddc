//! Miette diagnostic wrapper for message file errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![expect(unused_assignments)]

use std::fs::read_to_string;
use std::path::Path;

use miette::{Diagnostic, NamedSource, Report, SourceSpan, miette};
use polyglot::LoadError;
use thiserror::Error;

/// A miette-compatible diagnostic pointing into a message file.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(polyglot::syntax))]
pub struct MessageFileDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl MessageFileDiagnostic {
    /// Create a diagnostic for a 1-based line and column of `content`.
    pub fn new(path: &Path, content: &str, line: usize, column: usize, message: String) -> Self {
        // Sum of (line_length + 1) for lines before error line, plus column.
        let offset = content
            .lines()
            .take(line.saturating_sub(1))
            .map(|l| l.len() + 1)
            .sum::<usize>()
            + column.saturating_sub(1);

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        MessageFileDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message,
            help: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!("the file is decoded as {ext}")),
        }
    }
}

/// Turn a load error into a report, with source context when it has a
/// position.
pub fn report_load_error(path: &Path, error: LoadError) -> Report {
    match error {
        LoadError::Parse {
            line,
            column,
            message,
            ..
        } if line > 0 => match read_to_string(path) {
            Ok(content) => MessageFileDiagnostic::new(path, &content, line, column, message).into(),
            Err(_) => miette!("{}:{line}:{column}: {message}", path.display()),
        },
        other => miette!("{other}"),
    }
}

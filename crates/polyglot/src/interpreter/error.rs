//! Error types for the polyglot interpreter.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::{ParseError, Reference};
use crate::types::PluralForm;

/// A boxed error from a loader or parser collaborator.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that occur while registering or loading messages.
///
/// These are configuration mistakes and are always returned to the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The language tag does not parse.
    #[error("invalid language tag '{tag}': {source}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        source: icu_locale_core::ParseError,
    },

    /// A message record failed validation.
    #[error("invalid message '{id}': {reason}")]
    InvalidMessage { id: String, reason: String },

    /// File I/O error when reading a message file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error with file location context.
    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// No unmarshal function is registered for the file's extension.
    #[error("unsupported message file format '{format}' for '{}'", path.display())]
    UnsupportedFormat { path: PathBuf, format: String },

    /// The file name does not name a language.
    #[error("no language tag in message file name '{}'", path.display())]
    MissingLanguage { path: PathBuf },

    /// A loader failed to produce content.
    #[error("failed to load messages: {0}")]
    Loader(#[source] BoxError),

    /// A parser rejected the loaded content.
    #[error("failed to parse messages: {0}")]
    Parser(#[source] BoxError),
}

impl LoadError {
    /// Attach a file path to a parse error.
    pub(crate) fn parse(path: PathBuf, error: ParseError) -> Self {
        match error {
            ParseError::Syntax {
                line,
                column,
                message,
            } => LoadError::Parse {
                path,
                line,
                column,
                message,
            },
            other => LoadError::Parse {
                path,
                line: 0,
                column: 0,
                message: other.to_string(),
            },
        }
    }
}

/// An error that occurred while resolving a message.
///
/// The `localize` family of methods recovers from every variant by falling
/// back to a default message or the id.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The plural count is not a number.
    #[error("invalid plural count '{count}'")]
    InvalidPluralCount { count: String },

    /// No candidate language has the message.
    #[error("message '{id}' not found in {}", languages.join(", "))]
    MessageNotFound { id: String, languages: Vec<String> },

    /// Both the selected form and `other` are empty.
    #[error("message '{id}' has no template for '{form}' or 'other'")]
    EmptyTemplate { id: String, form: PluralForm },

    /// The template failed to render.
    #[error("failed to render message '{id}': {source}")]
    Interpolation {
        id: String,
        #[source]
        source: InterpolationError,
    },
}

/// An error that occurred while rendering a template.
#[derive(Debug, Error)]
pub enum InterpolationError {
    /// The data has no value for a reference.
    #[error("no value for '{reference}'")]
    MissingVariable { reference: Reference },

    /// The template is malformed.
    #[error(transparent)]
    Syntax(#[from] ParseError),
}

/// A non-fatal issue found when validating one language against another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadWarning {
    /// The target language has a message the source language lacks.
    #[error("message '{id}' in '{language}' does not exist in the source language")]
    UnknownMessage { id: String, language: String },

    /// A pluralized message lacks a form its language uses.
    #[error("message '{id}' in '{language}' is missing plural form '{form}'")]
    MissingPluralForm {
        id: String,
        language: String,
        form: PluralForm,
    },
}

/// Compute suggestions for a misspelled id.
///
/// Returns up to three candidates within a small edit distance, closest first.
pub fn compute_suggestions(id: &str, available: &[String]) -> Vec<String> {
    let max_distance = if id.len() > 3 { 2 } else { 1 };
    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (strsim::levenshtein(id, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

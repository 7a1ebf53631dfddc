//! CLI command implementations.

mod check;
mod coverage;
mod eval;

use std::path::Path;

use miette::{Result, miette};
use polyglot::interpreter::parse_language;
use polyglot::{Catalog, LanguageIdentifier};

use crate::output::report_load_error;

pub use check::{CheckArgs, run_check};
pub use coverage::{CoverageArgs, run_coverage};
pub use eval::{EvalArgs, run_eval};

/// Load a message file into a catalog, rendering parse errors with context.
pub(crate) fn load_into(catalog: &Catalog, path: &Path) -> Result<usize> {
    catalog
        .load_file(path)
        .map_err(|e| report_load_error(path, e))
}

/// Parse a language given on the command line.
pub(crate) fn language_arg(tag: &str) -> Result<LanguageIdentifier> {
    parse_language(tag).map_err(|e| miette!("{e}"))
}

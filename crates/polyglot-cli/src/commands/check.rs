//! Implementation of the `polyglot check` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use polyglot::parser::{file_language, parse_template};
use polyglot::{Catalog, LoadWarning};
use serde::Serialize;

use super::{language_arg, load_into};

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Message files to check (e.g. active.en.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Source language; other languages are validated against it
    #[arg(long, env = "POLYGLOT_LANG")]
    pub source: Option<String>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one problem.
#[derive(Debug, Serialize)]
struct Problem {
    severity: &'static str,
    language: String,
    id: String,
    message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let source = args.source.as_deref().map(language_arg).transpose()?;
    let default_language = match &source {
        Some(language) => language.clone(),
        None => language_arg("en")?,
    };
    let catalog = Catalog::new(default_language);

    for path in &args.files {
        load_into(&catalog, path)?;
    }

    let mut problems = Vec::new();
    for language in catalog.registered_tags() {
        for id in catalog.message_ids(&language) {
            let Some(message) = catalog.lookup(&language, &id) else {
                continue;
            };
            for form in message.forms() {
                if let Err(e) = parse_template(message.template(form), message.delimiters()) {
                    problems.push(Problem {
                        severity: "error",
                        language: language.to_string(),
                        id: id.clone(),
                        message: format!("message '{id}' form '{form}': {e}"),
                    });
                }
            }
        }

        if let Some(source) = source.as_ref().filter(|source| **source != language) {
            for warning in catalog.validate(source, &language) {
                let id = match &warning {
                    LoadWarning::UnknownMessage { id, .. }
                    | LoadWarning::MissingPluralForm { id, .. } => id.clone(),
                };
                problems.push(Problem {
                    severity: "warning",
                    language: language.to_string(),
                    id,
                    message: warning.to_string(),
                });
            }
        }
    }

    let errors = problems.iter().filter(|p| p.severity == "error").count();
    let warnings = problems.len() - errors;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&problems).into_diagnostic()?
        );
    } else {
        for problem in &problems {
            let label = if problem.severity == "error" {
                "error".red().bold().to_string()
            } else {
                "warning".yellow().bold().to_string()
            };
            println!("{label}: [{}] {}", problem.language, problem.message);
        }
        let languages: Vec<String> = args
            .files
            .iter()
            .filter_map(|path| file_language(path))
            .map(|language| language.to_string())
            .collect();
        println!(
            "{} {} file(s) ({}): {errors} error(s), {warnings} warning(s)",
            "checked".green(),
            args.files.len(),
            languages.join(", ")
        );
    }

    if errors > 0 || (args.strict && warnings > 0) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

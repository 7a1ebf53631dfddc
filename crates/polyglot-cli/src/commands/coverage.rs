//! Coverage command implementation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Result, miette};
use polyglot::Catalog;
use polyglot::parser::file_language;
use serde::Serialize;

use super::{language_arg, load_into};
use crate::output::table::{LanguageCoverage, format_coverage_table};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Source message file (e.g., active.en.json).
    #[arg(long)]
    pub source: PathBuf,

    /// Languages to check coverage for (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub lang: Vec<String>,

    /// Directory containing translation files. Defaults to source file directory.
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Exit with non-zero code if any translation is incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    language: String,
    translated: usize,
    total: usize,
    missing: Vec<String>,
}

/// The file holding `language`'s messages, named like the source file.
///
/// `active.en.json` with language `de` becomes `active.de.json`.
fn translation_file(source: &Path, source_language: &str, language: &str, dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let renamed: Vec<&str> = name
        .split('.')
        .map(|part| if part == source_language { language } else { part })
        .collect();
    dir.join(renamed.join("."))
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let source_language = file_language(&args.source)
        .ok_or_else(|| miette!("no language tag in file name {}", args.source.display()))?;
    let catalog = Catalog::new(source_language.clone());
    load_into(&catalog, &args.source)?;

    let source_ids: BTreeSet<String> = catalog.message_ids(&source_language).into_iter().collect();
    let source_count = source_ids.len();

    // Determine base directory for translation files
    let base_dir = args
        .translations
        .clone()
        .or_else(|| args.source.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut coverage_data: Vec<LanguageCoverage> = Vec::new();
    for lang in &args.lang {
        let language = language_arg(lang)?;
        let lang_file = translation_file(
            &args.source,
            &source_language.to_string(),
            &language.to_string(),
            &base_dir,
        );

        // A missing file leaves every message missing
        if lang_file.exists() {
            load_into(&catalog, &lang_file)?;
        }
        let translated: BTreeSet<String> = catalog.message_ids(&language).into_iter().collect();
        let missing: Vec<String> = source_ids.difference(&translated).cloned().collect();

        coverage_data.push(LanguageCoverage {
            language: language.to_string(),
            translated: source_ids.intersection(&translated).count(),
            missing,
        });
    }

    let any_incomplete = coverage_data.iter().any(|c| !c.missing.is_empty());

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .iter()
            .map(|c| CoverageJson {
                language: c.language.clone(),
                translated: c.translated,
                total: source_count,
                missing: c.missing.clone(),
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{json_output}");
    } else {
        let table = format_coverage_table(source_count, &coverage_data);
        println!("{table}");

        for lang_coverage in &coverage_data {
            if !lang_coverage.missing.is_empty() {
                println!("\nMissing in {}:", lang_coverage.language);
                for id in &lang_coverage.missing {
                    println!("  - {id}");
                }
            }
        }
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

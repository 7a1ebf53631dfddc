//! Implementation of the `polyglot eval` command.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use polyglot::{
    Catalog, DefaultMessages, EvalError, Localizer, PluralCount, TemplateData, Value,
    compute_suggestions,
};
use serde::Serialize;

use super::{language_arg, load_into};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Preferred languages, most preferred first (e.g. fr-CA,fr)
    #[arg(long, env = "POLYGLOT_LANG", value_delimiter = ',', required = true)]
    pub lang: Vec<String>,

    /// Language consulted when no preferred language has the message
    #[arg(long, default_value = "en")]
    pub default_lang: String,

    /// Message id to resolve
    #[arg(long, required = true)]
    pub message: String,

    /// Plural count
    #[arg(long)]
    pub count: Option<String>,

    /// Message files to load (e.g. active.en.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Template data in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((key.to_string(), value.to_string()))
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> Result<i32> {
    let catalog = Arc::new(Catalog::new(language_arg(&args.default_lang)?));
    for path in &args.files {
        load_into(&catalog, path)?;
    }
    let defaults = Arc::new(DefaultMessages::new());
    let localizer = Localizer::new(Arc::clone(&catalog), defaults, &args.lang);

    // Numbers become numeric values, everything else stays text
    let params: BTreeMap<String, Value> = args
        .params
        .into_iter()
        .map(|(k, v)| {
            let value = match v.parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::from(v),
            };
            (k, value)
        })
        .collect();
    let data = if params.is_empty() {
        TemplateData::None
    } else {
        TemplateData::Named(params)
    };
    let count = args.count.map(PluralCount::from);

    match localizer.resolve(&args.message, count.as_ref(), &data) {
        Ok(result) => {
            if args.json {
                let output = EvalResult { result };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{result}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            let suggestions = match &e {
                EvalError::MessageNotFound { id, .. } => {
                    let ids: Vec<String> = catalog
                        .registered_tags()
                        .iter()
                        .flat_map(|language| catalog.message_ids(language))
                        .collect();
                    compute_suggestions(id, &ids)
                }
                _ => Vec::new(),
            };
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string(),
                    "suggestions": suggestions,
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Evaluation error: {e}");
                if !suggestions.is_empty() {
                    eprintln!("Did you mean: {}?", suggestions.join(", "));
                }
            }
            Ok(exitcode::DATAERR)
        }
    }
}

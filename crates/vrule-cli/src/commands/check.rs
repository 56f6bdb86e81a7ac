//! Check command

use super::{read_json, to_json};
use crate::config::CliConfig;
use crate::extensions;
use anyhow::{Context, Result};
use clap::Args;
use console::{style, Emoji};
use serde_json::json;
use std::path::{Path, PathBuf};
use vrule::{form, Registry, Validator};

static PASS: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static FAIL: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file (JSON object of rule strings)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Input file to validate; repeat for several inputs
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Treat inputs as urlencoded form bodies
    #[arg(long)]
    pub form: bool,

    /// Extensions file to register before checking
    #[arg(short, long)]
    pub extensions: Option<PathBuf>,
}

/// Validate every input. Returns false if any input is invalid.
pub fn check(args: CheckArgs, config: &CliConfig) -> Result<bool> {
    extensions::register(args.extensions.as_deref(), Registry::global())?;

    let schema = read_json(&args.schema)?;
    let validator = Validator::new(&schema)
        .with_context(|| format!("invalid schema {}", args.schema.display()))?;

    let mut all_valid = true;
    for input in &args.inputs {
        let valid = if args.form {
            check_form(&validator, input, config.pretty)?
        } else {
            check_json(&validator, input, config.pretty)?
        };
        let mark = if valid { PASS } else { FAIL };
        eprintln!("{}{}", mark, style(input.display()).bold());
        all_valid &= valid;
    }

    tracing::debug!(inputs = args.inputs.len(), all_valid, "check finished");
    Ok(all_valid)
}

fn check_json(validator: &Validator, input: &Path, pretty: bool) -> Result<bool> {
    let record = read_json(input)?;
    let report = validator.validate(&record);
    println!("{}", to_json(&report, pretty)?);
    Ok(report.is_valid)
}

// Normalizes and validates separately from `Validator::check_form`, which
// discards the report printed on failure.
fn check_form(validator: &Validator, input: &Path, pretty: bool) -> Result<bool> {
    let body = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let pairs = form::parse_urlencoded(body.trim())
        .with_context(|| format!("{} is not a urlencoded body", input.display()))?;
    let record = form::normalize(pairs);
    let report = validator.validate(&record);

    let output = if report.is_valid {
        json!({"is_valid": true, "data": record})
    } else {
        serde_json::to_value(&report)?
    };
    println!("{}", to_json(&output, pretty)?);
    Ok(report.is_valid)
}

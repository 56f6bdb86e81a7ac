//! Lint command to check a schema without data

use super::read_json;
use crate::extensions;
use anyhow::Result;
use clap::Args;
use console::{style, Emoji};
use std::path::PathBuf;
use vrule::{Registry, Schema};

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static WARN: Emoji<'_, '_> = Emoji("⚠️ ", "! ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Arguments for the `lint` command
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Schema file (JSON object of rule strings)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Extensions file to register before linting
    #[arg(short, long)]
    pub extensions: Option<PathBuf>,
}

/// Compile the schema and look up every rule name it uses.
///
/// Returns false only on configuration errors. Unknown rule names are
/// warnings, since they may be registered at run time.
pub fn lint(args: LintArgs) -> Result<bool> {
    extensions::register(args.extensions.as_deref(), Registry::global())?;
    let definition = read_json(&args.schema)?;

    let schema = match Schema::compile(&definition) {
        Ok(schema) => schema,
        Err(err) => {
            println!("{} {}", ERROR, style(err).red());
            return Ok(false);
        }
    };

    let rules = Registry::global().rules();
    let mut warnings = 0;
    for (path, node) in schema.leaves() {
        for name in node.predicate_names() {
            if !rules.contains(name) {
                warnings += 1;
                println!(
                    "{} {} {}",
                    WARN,
                    style(&path).bold(),
                    style(format!("unknown rule `{name}`, reported as rule_not_found")).yellow()
                );
            }
        }
    }

    let fields = schema.leaves().len();
    println!(
        "{} {} {}",
        CHECK,
        style(args.schema.display()).bold(),
        style(format!("{fields} field(s), {warnings} warning(s)")).dim()
    );
    Ok(true)
}

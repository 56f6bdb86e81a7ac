//! CLI argument parsing

use crate::commands::{self, CheckArgs, LintArgs};
use crate::config::CliConfig;
use clap::{Parser, Subcommand};

/// vrule - validate JSON records and form data against rule schemas
#[derive(Parser, Debug)]
#[command(name = "vrule")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pretty-print JSON output (overrides VRULE_PRETTY)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log filter directive (overrides VRULE_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one or more inputs against a schema
    Check(CheckArgs),

    /// Compile a schema and report configuration problems
    Lint(LintArgs),

    /// List registered predicate names
    Rules {
        /// Extensions file to register before listing
        #[arg(short, long)]
        extensions: Option<std::path::PathBuf>,
    },
}

impl Cli {
    /// Execute the CLI command. Returns false when the command found invalid
    /// input or schema problems.
    pub fn execute(self, config: &CliConfig) -> anyhow::Result<bool> {
        match self.command {
            Commands::Check(args) => commands::check(args, config),
            Commands::Lint(args) => commands::lint(args),
            Commands::Rules { extensions } => commands::list_rules(extensions.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_accepts_repeated_inputs() {
        let cli = Cli::try_parse_from([
            "vrule", "check", "--schema", "s.json", "--input", "a.json", "--input", "b.json", "--pretty",
        ])
        .unwrap();
        assert!(cli.pretty);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.inputs.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }
}

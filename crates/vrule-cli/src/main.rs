//! `vrule` command-line tool

mod cli;
mod commands;
mod config;
mod extensions;

use clap::Parser;
use cli::Cli;
use console::style;
use std::process::ExitCode;

fn main() -> ExitCode {
    config::load_dotenv();
    let cli = Cli::parse();

    let config = match config::CliConfig::from_env() {
        Ok(config) => config.with_overrides(&cli),
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            return ExitCode::from(2);
        }
    };
    config::init_tracing(&config);

    match cli.execute(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::from(2)
        }
    }
}

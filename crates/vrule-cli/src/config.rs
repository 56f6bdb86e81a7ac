//! Environment configuration and logging setup.
//!
//! Settings come from `VRULE_*` variables, optionally loaded from a `.env`
//! file in the working directory. Command-line flags win over both.

use crate::cli::Cli;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// `VRULE_LOG`: an `EnvFilter` directive.
    #[serde(default = "default_log")]
    pub log: String,
    /// `VRULE_PRETTY`: pretty-print JSON reports.
    #[serde(default)]
    pub pretty: bool,
}

fn default_log() -> String {
    DEFAULT_LOG.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log: default_log(),
            pretty: false,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("VRULE_").from_env::<Self>()
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if cli.pretty {
            self.pretty = true;
        }
        if let Some(log) = &cli.log {
            self.log = log.clone();
        }
        self
    }
}

/// Load a `.env` file if present. Existing variables take precedence.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Install a stderr subscriber filtered by `config.log`.
pub fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

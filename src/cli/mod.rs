//! Command-line interface
//!
//! Argument definitions and dispatch for the `veteran-client` binary. Each
//! subcommand lives in its own module and reports failures through the exit
//! code: `0` on success, `1` when the input or the remote call was rejected.

pub mod input;
pub mod request;
pub mod token;

use crate::config::{ConfigLoader, Settings};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use input::{run_sanitize, run_validate};
pub use request::{RequestArgs, run_request};
pub use token::run_inspect_token;

/// Client runtime toolbox for the Veteran AI chat API
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "veteran-client")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a chat message and print it trimmed
    Validate {
        /// Text to check
        input: String,

        /// Maximum length in characters
        #[arg(long, default_value_t = crate::validation::DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Skip the markup and script injection checks
        #[arg(long)]
        allow_html: bool,
    },

    /// HTML-escape text for display
    Sanitize {
        /// Text to escape
        input: String,
    },

    /// Decode a bearer credential and report whether it is still live
    InspectToken {
        /// Three-segment signed credential
        token: String,
    },

    /// Call an API endpoint and print the JSON response
    Request(RequestArgs),
}

/// Parse arguments, set up logging and run the selected command
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = ConfigLoader::new().load(cli.config.as_deref())?;
    init_logging(&settings, cli.verbose);

    match cli.command {
        Command::Validate {
            input,
            max_length,
            allow_html,
        } => Ok(run_validate(&input, max_length, allow_html)),
        Command::Sanitize { input } => Ok(run_sanitize(&input)),
        Command::InspectToken { token } => run_inspect_token(&token),
        Command::Request(args) => run_request(settings, args).await,
    }
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` (or `logging.verbose`)
/// selects `debug` and the configured level applies.
pub fn init_logging(settings: &Settings, verbose: bool) {
    let fallback = if verbose || settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };

    // A second initialization attempt (e.g. from tests) is not an error
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

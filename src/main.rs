//! `veteran-client` binary
//!
//! # Usage
//!
//! ```bash
//! veteran-client validate "こんにちは"
//! veteran-client sanitize "<b>bold</b>"
//! veteran-client inspect-token "$TOKEN"
//! veteran-client --config client.toml request POST /chat/send --data '{"message":"hi"}'
//! ```

use clap::Parser;
use std::process::ExitCode;
use veteran_client::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cli::run(cli).await
}

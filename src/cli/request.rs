//! `request` command

use crate::{ClientRuntime, Settings, client::RequestOptions};
use anyhow::Context;
use clap::Args;
use reqwest::Method;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PATCH, DELETE, ...)
    pub method: String,

    /// Endpoint path below the configured base path
    pub endpoint: String,

    /// JSON request body
    #[arg(short, long, value_name = "JSON")]
    pub data: Option<String>,

    /// Bearer credential to store for this call
    #[arg(short, long, value_name = "TOKEN", env = "VETERAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Lifetime of the stored credential in seconds
    #[arg(long, value_name = "SECONDS")]
    pub ttl: Option<u64>,

    /// Override the request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Extra header as NAME:VALUE, may be repeated
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,
}

impl RequestArgs {
    fn options(&self) -> anyhow::Result<RequestOptions> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("Invalid HTTP method: {}", self.method))?;
        let mut options = RequestOptions::new().with_method(method);

        if let Some(data) = &self.data {
            let body: serde_json::Value =
                serde_json::from_str(data).context("--data must be valid JSON")?;
            options = options.with_json(&body)?;
        }

        for header in &self.headers {
            let (name, value) = header
                .split_once(':')
                .with_context(|| format!("Header must be NAME:VALUE, got {:?}", header))?;
            options = options.with_header(name.trim(), value.trim());
        }

        if let Some(ms) = self.timeout_ms {
            options = options.with_timeout(Duration::from_millis(ms));
        }

        Ok(options)
    }
}

/// Perform one API call and print the response body as JSON.
///
/// Ctrl-C cancels the in-flight call.
pub async fn run_request(settings: Settings, args: RequestArgs) -> anyhow::Result<ExitCode> {
    let runtime = ClientRuntime::new(settings)?;
    let cancellation = CancellationToken::new();
    let options = args.options()?.with_cancellation(cancellation.clone());

    if let Some(token) = &args.token {
        let ttl = args
            .ttl
            .unwrap_or(runtime.settings().session.default_ttl_secs);
        if !runtime.session().set_token(token, ttl) {
            warn!("Credential could not be stored; sending without it");
        }
    }

    let guard = cancellation.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling request");
            guard.cancel();
        }
    });

    debug!("Calling {} {}", args.method, args.endpoint);
    let outcome = runtime.client().call(&args.endpoint, options).await;
    interrupt.abort();

    match outcome {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            runtime.report(&e);
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

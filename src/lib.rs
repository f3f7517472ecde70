//! Veteran AI Client Runtime
//!
//! The non-visual core of the Veteran AI chat client: input validation,
//! transient notifications, bearer-token session management with an expiry
//! watch, and an HTTP request client with timeouts and cancellation.
//!
//! # Architecture
//!
//! - [`validation`]: length limits, injection signature checks and HTML escaping
//! - [`notify`]: timed notifications handed to a pluggable presentation surface
//! - [`session`]: token records, credential checks and the expiry watch timer
//! - [`client`]: API calls with bearer auth, timeout and status mapping
//! - [`runtime`]: one context object wiring the services together
//!
//! # Usage
//!
//! ```bash
//! veteran-client validate "こんにちは"
//! veteran-client request GET /conversations --token "$TOKEN"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use veteran_client::{ClientRuntime, Settings, validate_input};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runtime = ClientRuntime::new(Settings::default())?;
//! let message = validate_input(Some("こんにちは"), 1000, false)?;
//! let reply = runtime
//!     .client()
//!     .post("/chat/send", &serde_json::json!({ "message": message.as_str() }), Default::default())
//!     .await;
//! if let Err(e) = reply {
//!     runtime.report(&e);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod utils;
pub mod validation;

pub use client::{RequestClient, RequestOptions};
pub use config::Settings;
pub use error::{Error, Result};
pub use notify::Notifier;
pub use runtime::ClientRuntime;
pub use session::SessionStore;
pub use validation::{SafeString, sanitize, validate_input};

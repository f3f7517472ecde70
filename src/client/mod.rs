//! Request orchestration
//!
//! [`RequestClient`] is the single network entry point for UI flows. It
//! attaches the current bearer token, enforces a timeout, honours external
//! cancellation and maps failures onto the crate's [`Error`](crate::Error)
//! taxonomy. It makes at most one attempt per call.

pub mod client;
pub mod request;

pub use client::RequestClient;
pub use request::{CallState, RequestOptions, UNKNOWN_ERROR_MESSAGE, status_message};

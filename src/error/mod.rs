//! Error handling for the client runtime
//!
//! This module defines the closed error taxonomy surfaced to UI flows along with
//! the internal failure kinds used by configuration and storage.

pub mod types;

pub use types::{Error, Result};

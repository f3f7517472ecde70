//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the application.

pub mod nonce;
pub mod rate_limit;
pub mod timing;
pub mod version;

pub use nonce::generate_nonce;
pub use rate_limit::{Debouncer, Throttle};
pub use timing::{PerformanceMonitor, Stopwatch};
pub use version::{VERSION, get_version};

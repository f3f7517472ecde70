//! Version information

/// Crate version as compiled
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the crate version string
pub fn get_version() -> &'static str {
    VERSION
}

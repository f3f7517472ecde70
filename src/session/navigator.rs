//! Navigation hook used by the session-expired notification

use std::fmt::Debug;

/// Performs a redirect to another location of the client
pub trait Navigator: Send + Sync + Debug {
    fn navigate(&self, location: &str);
}

/// Navigator that only logs the requested redirect
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, location: &str) {
        tracing::info!("Redirect requested to {}", location);
    }
}

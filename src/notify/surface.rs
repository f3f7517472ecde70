//! Presentation surfaces for notifications
//!
//! The notifier never renders anything itself. It hands snapshots to a
//! [`PresentationSurface`]; failures there are logged and otherwise ignored.

use super::types::{NotificationId, NotificationSnapshot, Severity};
use crate::Result;
use std::fmt::Debug;

/// Something able to display and remove notification elements
pub trait PresentationSurface: Send + Sync + Debug {
    /// Display a newly created notification
    fn present(&self, notification: &NotificationSnapshot) -> Result<()>;

    /// Start the exit transition of a notification
    fn begin_close(&self, _id: NotificationId) -> Result<()> {
        Ok(())
    }

    /// Remove the element once the exit transition has finished
    fn dismiss(&self, _id: NotificationId) -> Result<()> {
        Ok(())
    }
}

/// Surface that renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl PresentationSurface for NullSurface {
    fn present(&self, _notification: &NotificationSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Surface that writes notifications to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSurface;

impl PresentationSurface for TracingSurface {
    fn present(&self, notification: &NotificationSnapshot) -> Result<()> {
        let id = notification.id;
        let message = &notification.message;
        match notification.severity {
            Severity::Error => tracing::error!(%id, "{}", message),
            Severity::Warning => tracing::warn!(%id, "{}", message),
            Severity::Info | Severity::Success => tracing::info!(%id, "{}", message),
        }
        Ok(())
    }

    fn dismiss(&self, id: NotificationId) -> Result<()> {
        tracing::debug!(%id, "notification dismissed");
        Ok(())
    }
}

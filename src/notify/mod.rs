//! Ephemeral notification queue
//!
//! The [`Notifier`] owns the set of transient alerts shown to the user. Each
//! notification auto-dismisses after a configured duration, can be dismissed
//! manually, and passes through a short closing state before it is purged so
//! the presentation layer can run an exit transition.

pub mod notifier;
pub mod surface;
pub mod types;

pub use notifier::Notifier;
pub use surface::{NullSurface, PresentationSurface, TracingSurface};
pub use types::{
    NotificationAction, NotificationId, NotificationSnapshot, NotificationState, Severity,
    ShowOptions,
};

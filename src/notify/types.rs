//! Notification data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Label used for an action button when none is supplied
pub const DEFAULT_ACTION_LABEL: &str = "実行";

/// Unique identifier of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub(crate) u64);

impl NotificationId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

/// Presentation style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an active notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    Visible,
    /// Exit transition running; purged once the close delay elapses
    Closing,
}

/// A labelled callback attached to a notification
///
/// Invoking the action always dismisses the notification.
#[derive(Clone)]
pub struct NotificationAction {
    pub label: String,
    pub(crate) callback: Arc<dyn Fn() + Send + Sync>,
}

impl NotificationAction {
    /// Create an action with the default label
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: DEFAULT_ACTION_LABEL.to_string(),
            callback: Arc::new(callback),
        }
    }

    /// Set the button label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Run the callback
    pub fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Per-call options for [`Notifier::show`](super::Notifier::show)
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Auto-dismiss delay; `None` or zero uses the configured default
    pub duration: Option<Duration>,
    /// Optional action button
    pub action: Option<NotificationAction>,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Notification record as held in the active set
#[derive(Debug, Clone)]
pub(crate) struct NotificationRecord {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub action: Option<NotificationAction>,
    pub created_at: DateTime<Utc>,
    pub state: NotificationState,
}

impl NotificationRecord {
    pub fn snapshot(&self) -> NotificationSnapshot {
        NotificationSnapshot {
            id: self.id,
            message: self.message.clone(),
            severity: self.severity,
            action_label: self.action.as_ref().map(|action| action.label.clone()),
            created_at: self.created_at,
            state: self.state,
        }
    }
}

/// Read-only view of a notification handed to surfaces and callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationSnapshot {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub action_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub state: NotificationState,
}

//! Notification queue with auto-dismiss and manual dismiss
//!
//! ## Lifecycle
//!
//! ```text
//! show ──► Visible ──(duration | remove | action)──► Closing ──(close delay)──► purged
//! ```
//!
//! Removal timers run as Tokio tasks holding only a weak reference to the
//! queue, so dropping the last [`Notifier`] handle ends them quietly.

use super::surface::{NullSurface, PresentationSurface};
use super::types::{
    NotificationId, NotificationRecord, NotificationSnapshot, NotificationState, Severity,
    ShowOptions,
};
use crate::{Error, config::NotificationSettings};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;

/// Handle to the process-wide notification queue
///
/// Clones share the same active set.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

#[derive(Debug)]
struct NotifierInner {
    settings: NotificationSettings,
    surface: Arc<dyn PresentationSurface>,
    next_id: AtomicU64,
    active: Mutex<Vec<ActiveNotification>>,
}

#[derive(Debug)]
struct ActiveNotification {
    record: NotificationRecord,
    auto_dismiss: Option<AbortHandle>,
}

impl NotifierInner {
    fn active(&self) -> MutexGuard<'_, Vec<ActiveNotification>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier {
    /// Create a notifier presenting through `surface`
    pub fn new(settings: NotificationSettings, surface: Arc<dyn PresentationSurface>) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                settings,
                surface,
                next_id: AtomicU64::new(0),
                active: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Show a notification and schedule its automatic removal
    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        options: ShowOptions,
    ) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let duration = options
            .duration
            .filter(|duration| !duration.is_zero())
            .unwrap_or_else(|| self.inner.settings.duration());

        let record = NotificationRecord {
            id,
            message: message.into(),
            severity,
            action: options.action,
            created_at: Utc::now(),
            state: NotificationState::Visible,
        };
        let snapshot = record.snapshot();

        self.inner.active().push(ActiveNotification {
            record,
            auto_dismiss: None,
        });

        if let Err(e) = self.inner.surface.present(&snapshot) {
            tracing::debug!(%id, "Notification surface unavailable: {}", e);
        }

        if let Some(handle) = self.schedule(duration, move |notifier| notifier.remove(id)) {
            let mut active = self.inner.active();
            match active.iter_mut().find(|entry| entry.record.id == id) {
                Some(entry) if entry.record.state == NotificationState::Visible => {
                    entry.auto_dismiss = Some(handle);
                }
                _ => handle.abort(),
            }
        }

        tracing::debug!(%id, %severity, ?duration, "Notification shown");
        id
    }

    pub fn success(&self, message: impl Into<String>, options: ShowOptions) -> NotificationId {
        self.show(message, Severity::Success, options)
    }

    pub fn error(&self, message: impl Into<String>, options: ShowOptions) -> NotificationId {
        self.show(message, Severity::Error, options)
    }

    pub fn warning(&self, message: impl Into<String>, options: ShowOptions) -> NotificationId {
        self.show(message, Severity::Warning, options)
    }

    pub fn info(&self, message: impl Into<String>, options: ShowOptions) -> NotificationId {
        self.show(message, Severity::Info, options)
    }

    /// Surface a failure as an error notification
    pub fn report(&self, error: &Error) -> NotificationId {
        self.error(error.to_string(), ShowOptions::default())
    }

    /// Dismiss a notification.
    ///
    /// Moves a visible notification to [`NotificationState::Closing`] and purges
    /// it after the close delay. Unknown ids and notifications that are already
    /// closing are ignored.
    pub fn remove(&self, id: NotificationId) {
        let auto_dismiss = {
            let mut active = self.inner.active();
            let Some(entry) = active.iter_mut().find(|entry| entry.record.id == id) else {
                return;
            };
            if entry.record.state == NotificationState::Closing {
                return;
            }
            entry.record.state = NotificationState::Closing;
            entry.auto_dismiss.take()
        };

        if let Some(handle) = auto_dismiss {
            handle.abort();
        }

        if let Err(e) = self.inner.surface.begin_close(id) {
            tracing::debug!(%id, "Notification surface failed to close: {}", e);
        }

        let close_delay = self.inner.settings.close_delay();
        if self
            .schedule(close_delay, move |notifier| notifier.purge(id))
            .is_none()
        {
            self.purge(id);
        }
    }

    /// Run the action attached to a visible notification, then dismiss it.
    ///
    /// Returns `false` if the notification is gone, closing, or has no action.
    pub fn trigger_action(&self, id: NotificationId) -> bool {
        let action = {
            let active = self.inner.active();
            active
                .iter()
                .find(|entry| {
                    entry.record.id == id && entry.record.state == NotificationState::Visible
                })
                .and_then(|entry| entry.record.action.clone())
        };

        let Some(action) = action else {
            return false;
        };

        action.invoke();
        self.remove(id);
        true
    }

    /// Snapshot of the active set in insertion order
    pub fn active(&self) -> Vec<NotificationSnapshot> {
        self.inner
            .active()
            .iter()
            .map(|entry| entry.record.snapshot())
            .collect()
    }

    /// Look up one active notification
    pub fn get(&self, id: NotificationId) -> Option<NotificationSnapshot> {
        self.inner
            .active()
            .iter()
            .find(|entry| entry.record.id == id)
            .map(|entry| entry.record.snapshot())
    }

    pub fn len(&self) -> usize {
        self.inner.active().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.active().is_empty()
    }

    fn purge(&self, id: NotificationId) {
        let removed = {
            let mut active = self.inner.active();
            let before = active.len();
            active.retain(|entry| entry.record.id != id);
            active.len() != before
        };

        if removed {
            if let Err(e) = self.inner.surface.dismiss(id) {
                tracing::debug!(%id, "Notification surface failed to dismiss: {}", e);
            }
            tracing::debug!(%id, "Notification purged");
        }
    }

    /// Run `task` after `delay` on the current Tokio runtime
    fn schedule<F>(&self, delay: Duration, task: F) -> Option<AbortHandle>
    where
        F: FnOnce(Notifier) + Send + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime available, notification timer not scheduled");
                return None;
            }
        };

        let weak: Weak<NotifierInner> = Arc::downgrade(&self.inner);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                task(Notifier { inner });
            }
        });
        Some(handle.abort_handle())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationSettings::default(), Arc::new(NullSurface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::types::NotificationAction;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    const CLOSE: Duration = Duration::from_millis(300);

    #[derive(Debug, Default)]
    struct RecordingSurface {
        events: Mutex<Vec<String>>,
    }

    impl PresentationSurface for RecordingSurface {
        fn present(&self, notification: &NotificationSnapshot) -> crate::Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("present:{}", notification.message));
            Ok(())
        }

        fn begin_close(&self, id: NotificationId) -> crate::Result<()> {
            self.events.lock().unwrap().push(format!("close:{}", id.get()));
            Ok(())
        }

        fn dismiss(&self, id: NotificationId) -> crate::Result<()> {
            self.events.lock().unwrap().push(format!("dismiss:{}", id.get()));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenSurface;

    impl PresentationSurface for BrokenSurface {
        fn present(&self, _notification: &NotificationSnapshot) -> crate::Result<()> {
            Err(Error::internal("no notification container"))
        }

        fn begin_close(&self, _id: NotificationId) -> crate::Result<()> {
            Err(Error::internal("no notification container"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_assigns_unique_ids_in_insertion_order() {
        let notifier = Notifier::default();

        let first = notifier.info("first", ShowOptions::default());
        let second = notifier.success("second", ShowOptions::default());
        let third = notifier.warning("third", ShowOptions::default());

        assert_ne!(first, second);
        assert_ne!(second, third);

        let active = notifier.active();
        let messages: Vec<_> = active.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(active[1].severity, Severity::Success);
        assert!(active.iter().all(|n| n.state == NotificationState::Visible));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_after_default_duration() {
        let notifier = Notifier::default();
        let id = notifier.info("hello", ShowOptions::default());

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Visible);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Closing);

        tokio::time::sleep(CLOSE).await;
        assert!(notifier.get(id).is_none());
        assert!(notifier.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_duration() {
        let notifier = Notifier::default();
        let id = notifier.error(
            "short",
            ShowOptions::new().with_duration(Duration::from_millis(1000)),
        );

        tokio::time::sleep(Duration::from_millis(1001) + CLOSE).await;
        assert!(notifier.get(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_uses_default() {
        let notifier = Notifier::default();
        let id = notifier.info("zero", ShowOptions::new().with_duration(Duration::ZERO));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_closes_then_purges() {
        let surface = Arc::new(RecordingSurface::default());
        let notifier = Notifier::new(NotificationSettings::default(), surface.clone());
        let id = notifier.info("bye", ShowOptions::default());

        notifier.remove(id);
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Closing);

        // Second remove during the exit transition is a no-op
        notifier.remove(id);

        tokio::time::sleep(CLOSE + Duration::from_millis(1)).await;
        assert!(notifier.get(id).is_none());

        let events = surface.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "present:bye".to_string(),
                format!("close:{}", id.get()),
                format!("dismiss:{}", id.get()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_remove_cancels_auto_dismiss() {
        let surface = Arc::new(RecordingSurface::default());
        let notifier = Notifier::new(NotificationSettings::default(), surface.clone());
        let id = notifier.info("manual", ShowOptions::default());

        notifier.remove(id);
        tokio::time::sleep(Duration::from_millis(10_000)).await;

        let closes = surface
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.starts_with("close:"))
            .count();
        assert_eq!(closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_unknown_id_is_noop() {
        let notifier = Notifier::default();
        let id = notifier.info("keep", ShowOptions::default());

        notifier.remove(NotificationId(999));
        assert_eq!(notifier.len(), 1);
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_action_runs_callback_and_dismisses() {
        let notifier = Notifier::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = notifier.warning(
            "retry?",
            ShowOptions::new().with_action(
                NotificationAction::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .with_label("再試行"),
            ),
        );

        assert_eq!(notifier.get(id).unwrap().action_label.as_deref(), Some("再試行"));
        assert!(notifier.trigger_action(id));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Closing);

        // Closing notifications no longer accept the action
        assert!(!notifier.trigger_action(id));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_may_reenter_notifier() {
        let notifier = Notifier::default();
        let inner = notifier.clone();
        let id = notifier.info(
            "chain",
            ShowOptions::new().with_action(NotificationAction::new(move || {
                inner.success("done", ShowOptions::default());
            })),
        );

        assert!(notifier.trigger_action(id));
        assert_eq!(notifier.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_without_action() {
        let notifier = Notifier::default();
        let id = notifier.info("plain", ShowOptions::default());
        assert!(!notifier.trigger_action(id));
        assert_eq!(notifier.get(id).unwrap().state, NotificationState::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_broken_surface_still_schedules_removal() {
        let notifier = Notifier::new(NotificationSettings::default(), Arc::new(BrokenSurface));
        let id = notifier.error("unseen", ShowOptions::default());
        assert_eq!(notifier.len(), 1);

        tokio::time::sleep(Duration::from_millis(5000) + CLOSE + Duration::from_millis(1)).await;
        assert!(notifier.get(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_error() {
        let notifier = Notifier::default();
        let id = notifier.report(&Error::api(403, "アクセス権限がありません"));

        let snapshot = notifier.get(id).unwrap();
        assert_eq!(snapshot.severity, Severity::Error);
        assert_eq!(snapshot.message, "アクセス権限がありません");
    }

    #[test]
    fn test_without_runtime_remove_purges_immediately() {
        let notifier = Notifier::default();
        let id = notifier.info("sync", ShowOptions::default());
        assert_eq!(notifier.len(), 1);

        notifier.remove(id);
        assert!(notifier.is_empty());
    }
}

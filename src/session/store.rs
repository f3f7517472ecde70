//! # Session Token Store
//!
//! Owns the bearer token record, its expiry, and the single expiry watch timer.
//!
//! ## Storage scopes
//!
//! Reads prefer the session scope and fall back to the persistent scope; writes
//! only ever go to the session scope. A stale credential left in the
//! persistent scope therefore stays readable until something clears it.
//!
//! ## Watch timer
//!
//! Every successful [`SessionStore::set_token`] arms one timer for the record's
//! expiry, aborting whatever timer was armed before. When the timer fires and
//! no live token remains, the store raises an error notification whose action
//! redirects to the authentication entry point.
//!
//! ## Examples
//!
//! ```rust
//! use veteran_client::config::SessionSettings;
//! use veteran_client::notify::Notifier;
//! use veteran_client::session::SessionStore;
//!
//! # tokio_test::block_on(async {
//! let store = SessionStore::builder(SessionSettings::default(), Notifier::default()).build();
//!
//! // Opaque strings are not structurally valid credentials
//! assert!(store.set_token("not-a-credential", 60));
//! assert_eq!(store.get_token(), None);
//! # });
//! ```

use super::clock::{AnchoredClock, Clock};
use super::navigator::{LoggingNavigator, Navigator};
use super::token::{TokenRecord, is_live_credential};
use crate::{
    Result,
    config::SessionSettings,
    notify::{NotificationAction, Notifier, ShowOptions},
    storage::{KeyValueStore, MemoryStore},
    utils::generate_nonce,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

/// Message shown when the watch timer finds the session gone
pub const SESSION_EXPIRED_MESSAGE: &str = "セッションが期限切れです";

/// Handle to the session token store
///
/// Clones share the same record and watch timer.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    settings: SessionSettings,
    session: Arc<dyn KeyValueStore>,
    fallback: Option<Arc<dyn KeyValueStore>>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    navigator: Arc<dyn Navigator>,
    watch: Mutex<Option<WatchTimer>>,
    generation: AtomicU64,
}

#[derive(Debug)]
struct WatchTimer {
    generation: u64,
    fires_at: DateTime<Utc>,
    handle: AbortHandle,
}

impl SessionInner {
    fn watch(&self) -> MutexGuard<'_, Option<WatchTimer>> {
        self.watch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`SessionStore`]
#[derive(Debug)]
pub struct SessionStoreBuilder {
    settings: SessionSettings,
    notifier: Notifier,
    session: Option<Arc<dyn KeyValueStore>>,
    fallback: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl SessionStoreBuilder {
    /// Session-scoped store; defaults to an unbounded [`MemoryStore`]
    pub fn session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Longer-lived store consulted when the session scope is empty
    pub fn fallback_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.fallback = Some(store);
        self
    }

    /// Time source; defaults to [`AnchoredClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Redirect hook for the session-expired action; defaults to [`LoggingNavigator`]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> SessionStore {
        SessionStore {
            inner: Arc::new(SessionInner {
                settings: self.settings,
                session: self
                    .session
                    .unwrap_or_else(|| Arc::new(MemoryStore::new())),
                fallback: self.fallback,
                clock: self.clock.unwrap_or_else(|| Arc::new(AnchoredClock::new())),
                notifier: self.notifier,
                navigator: self.navigator.unwrap_or_else(|| Arc::new(LoggingNavigator)),
                watch: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }
}

impl SessionStore {
    /// Start building a store that reports expiry through `notifier`
    pub fn builder(settings: SessionSettings, notifier: Notifier) -> SessionStoreBuilder {
        SessionStoreBuilder {
            settings,
            notifier,
            session: None,
            fallback: None,
            clock: None,
            navigator: None,
        }
    }

    /// Store `token` for `expires_in_secs` seconds and re-arm the watch timer.
    ///
    /// Returns `false` if the record could not be written (for example when
    /// the storage quota is exceeded) or the lifetime is zero.
    pub fn set_token(&self, token: &str, expires_in_secs: u64) -> bool {
        if expires_in_secs == 0 {
            warn!("Refusing to store a token with a zero lifetime");
            return false;
        }

        let ttl = Duration::from_secs(expires_in_secs);
        let record = TokenRecord::new(token, self.inner.clock.now(), ttl, generate_nonce());

        let serialized = match serde_json::to_string(&record) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize token record: {}", e);
                return false;
            }
        };

        if let Err(e) = self
            .inner
            .session
            .set(&self.inner.settings.token_key, &serialized)
        {
            error!("Failed to store token: {}", e);
            return false;
        }

        self.arm_watch(ttl, record.expires_at);
        debug!("Stored token expiring at {}", record.expires_at);
        true
    }

    /// Store `token` with the configured default lifetime
    pub fn set_token_with_default_ttl(&self, token: &str) -> bool {
        self.set_token(token, self.inner.settings.default_ttl_secs)
    }

    /// Current bearer token, if a live one is stored.
    ///
    /// An expired, structurally invalid or unreadable record is cleared.
    pub fn get_token(&self) -> Option<String> {
        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to retrieve token: {}", e);
                self.clear_token();
                return None;
            }
        };

        let now = self.inner.clock.now();
        if record.is_expired_at(now) {
            debug!("Stored token expired at {}", record.expires_at);
            self.clear_token();
            return None;
        }

        if !is_live_credential(&record.token, now) {
            debug!("Stored token failed credential validation");
            self.clear_token();
            return None;
        }

        Some(record.token)
    }

    /// Remove the record from every scope and cancel the watch timer
    pub fn clear_token(&self) {
        let key = &self.inner.settings.token_key;
        if let Err(e) = self.inner.session.remove(key) {
            warn!("Failed to remove session token: {}", e);
        }
        if let Some(fallback) = &self.inner.fallback {
            if let Err(e) = fallback.remove(key) {
                warn!("Failed to remove persisted token: {}", e);
            }
        }

        if let Some(timer) = self.inner.watch().take() {
            timer.handle.abort();
            debug!("Cancelled session watch due at {}", timer.fires_at);
        }
    }

    /// Remaining lifetime of the stored token; zero when no live token exists
    pub fn time_to_expiry(&self) -> Duration {
        match self.read_record() {
            Ok(Some(record)) => {
                let now = self.inner.clock.now();
                if is_live_credential(&record.token, now) {
                    record.time_to_expiry_at(now)
                } else {
                    Duration::ZERO
                }
            }
            Ok(None) => Duration::ZERO,
            Err(e) => {
                debug!("Failed to read token record: {}", e);
                Duration::ZERO
            }
        }
    }

    /// Whether an expiry watch is currently armed
    pub fn has_pending_watch(&self) -> bool {
        self.inner.watch().is_some()
    }

    /// Instant the armed watch will fire at
    pub fn watch_deadline(&self) -> Option<DateTime<Utc>> {
        self.inner.watch().as_ref().map(|timer| timer.fires_at)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    fn read_record(&self) -> Result<Option<TokenRecord>> {
        let key = &self.inner.settings.token_key;
        let stored = match self.inner.session.get(key)? {
            Some(stored) => Some(stored),
            None => match &self.inner.fallback {
                Some(fallback) => fallback.get(key)?,
                None => None,
            },
        };

        match stored {
            Some(stored) => Ok(Some(serde_json::from_str(&stored)?)),
            None => Ok(None),
        }
    }

    fn arm_watch(&self, delay: Duration, fires_at: DateTime<Utc>) {
        let mut slot = self.inner.watch();
        if let Some(previous) = slot.take() {
            previous.handle.abort();
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime available, session expiry watch not armed");
                return;
            }
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                SessionStore { inner }.on_watch_fired(generation);
            }
        });

        *slot = Some(WatchTimer {
            generation,
            fires_at,
            handle: handle.abort_handle(),
        });
    }

    fn on_watch_fired(&self, generation: u64) {
        {
            let mut slot = self.inner.watch();
            match slot.as_ref() {
                Some(timer) if timer.generation == generation => {
                    slot.take();
                }
                // Superseded by a later arm or a clear
                _ => return,
            }
        }

        if self.get_token().is_some() {
            // Clock and timer disagree; wait out the record's remaining lifetime
            if let Ok(Some(record)) = self.read_record() {
                let remaining = record.time_to_expiry_at(self.inner.clock.now());
                if !remaining.is_zero() {
                    debug!("Token still live at watch deadline, re-arming for {:?}", remaining);
                    self.arm_watch(remaining, record.expires_at);
                    return;
                }
            }
        }

        info!("Session expired, prompting for re-authentication");
        let navigator = self.inner.navigator.clone();
        let target = self.inner.settings.auth_redirect.clone();
        self.inner.notifier.error(
            SESSION_EXPIRED_MESSAGE,
            ShowOptions::new().with_action(NotificationAction::new(move || {
                navigator.navigate(&target)
            })),
        );
    }
}

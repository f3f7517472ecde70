//! Client runtime context
//!
//! Wires the notifier, the session store and the request client together from
//! one [`Settings`] value so the rest of the application receives them as a
//! single context instead of reaching for globals.

use crate::{
    Error, Result,
    client::RequestClient,
    config::Settings,
    notify::{NotificationId, Notifier, PresentationSurface, TracingSurface},
    session::{Navigator, SessionStore},
    storage::{FileStore, KeyValueStore, MemoryStore},
    utils::get_version,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared services of one client instance
#[derive(Debug, Clone)]
pub struct ClientRuntime {
    settings: Arc<Settings>,
    notifier: Notifier,
    session: SessionStore,
    client: RequestClient,
}

/// Builder for [`ClientRuntime`]
#[derive(Debug)]
pub struct ClientRuntimeBuilder {
    settings: Settings,
    surface: Option<Arc<dyn PresentationSurface>>,
    session_store: Option<Arc<dyn KeyValueStore>>,
    fallback_store: Option<Arc<dyn KeyValueStore>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ClientRuntimeBuilder {
    /// Where notifications are rendered; defaults to [`TracingSurface`]
    pub fn surface(mut self, surface: Arc<dyn PresentationSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Session-scoped token storage; defaults to a [`MemoryStore`]
    pub fn session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Persistent token storage; defaults to a [`FileStore`] in the storage directory
    pub fn fallback_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.fallback_store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Validate the settings and assemble the runtime
    pub fn build(self) -> Result<ClientRuntime> {
        self.settings.validate()?;

        let surface = self.surface.unwrap_or_else(|| Arc::new(TracingSurface));
        let notifier = Notifier::new(self.settings.notifications.clone(), surface);

        let session_store = self
            .session_store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let fallback_store = match self.fallback_store {
            Some(store) => store,
            None => {
                let dir = self.settings.session.resolve_storage_dir();
                debug!("Persistent token storage in {}", dir.display());
                Arc::new(FileStore::in_dir(dir))
            }
        };

        let mut session = SessionStore::builder(self.settings.session.clone(), notifier.clone())
            .session_store(session_store)
            .fallback_store(fallback_store);
        if let Some(navigator) = self.navigator {
            session = session.navigator(navigator);
        }
        let session = session.build();

        let client = RequestClient::new(&self.settings.api, session.clone())?;

        info!(
            "Client runtime v{} ready for {}{}",
            get_version(),
            self.settings.api.base_url,
            self.settings.api.base_path
        );

        Ok(ClientRuntime {
            settings: Arc::new(self.settings),
            notifier,
            session,
            client,
        })
    }
}

impl ClientRuntime {
    pub fn builder(settings: Settings) -> ClientRuntimeBuilder {
        ClientRuntimeBuilder {
            settings,
            surface: None,
            session_store: None,
            fallback_store: None,
            navigator: None,
        }
    }

    /// Build a runtime with the default collaborators
    pub fn new(settings: Settings) -> Result<Self> {
        Self::builder(settings).build()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// Show a failure to the user as an error notification
    pub fn report(&self, error: &Error) -> NotificationId {
        self.notifier.report(error)
    }
}

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use bibliofind_core::{
    BookSearchProvider, Clock, Config, KeyValueStore, SanitizedConfig, SearchSessionController,
};

use crate::metrics::ACTIVE_SESSIONS;

/// Shared application state
pub struct AppState {
    config: Config,
    provider: Arc<dyn BookSearchProvider>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Live sessions. History is reloaded from the store per session, so
    /// sessions share persisted history but never in-memory state.
    sessions: RwLock<HashMap<Uuid, Arc<SearchSessionController>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn BookSearchProvider>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            provider,
            store,
            clock,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn create_session(&self) -> Uuid {
        let controller = Arc::new(SearchSessionController::new(
            self.provider.clone(),
            self.store.clone(),
            self.clock.clone(),
            &self.config.session,
        ));
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(id, controller);
        ACTIVE_SESSIONS.set(sessions.len() as i64);
        id
    }

    pub fn session(&self, id: &Uuid) -> Option<Arc<SearchSessionController>> {
        self.sessions.read().unwrap().get(id).cloned()
    }

    pub fn remove_session(&self, id: &Uuid) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        let removed = sessions.remove(id).is_some();
        ACTIVE_SESSIONS.set(sessions.len() as i64);
        removed
    }

    pub fn session_ids(&self) -> Vec<Uuid> {
        self.sessions.read().unwrap().keys().copied().collect()
    }
}

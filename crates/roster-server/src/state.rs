use roster_core::config::Config;
use roster_core::session::FormSession;
use roster_core::store::EmployeeStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub type Sessions = Arc<Mutex<HashMap<Uuid, FormSession>>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<EmployeeStore>,
    /// Open form sessions. Removed on successful submit, on
    /// `DELETE /api/forms/{sid}`, or when the view that opened one is left.
    pub sessions: Sessions,
    /// The session opened by the last `/create` or `/edit/{id}` view.
    pub view_session: Arc<Mutex<Option<Uuid>>>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            store: Arc::new(EmployeeStore::new(root.clone())),
            root,
            config: Arc::new(config),
            sessions: Arc::default(),
            view_session: Arc::default(),
        }
    }

    /// Load `.roster/config.yaml` under `root`; an unreadable file falls
    /// back to defaults with a warning.
    pub fn load(root: PathBuf) -> Self {
        let config = Config::load(&root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config, using defaults");
            Config::default()
        });
        Self::new(root, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"), Config::default());
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
        assert_eq!(state.store.root(), state.root.as_path());
        assert!(state.sessions.lock().unwrap().is_empty());
        assert!(state.view_session.lock().unwrap().is_none());
    }
}

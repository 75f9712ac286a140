use crate::notify::NotificationHub;
use crate::submission::Submitter;
use crate::wizard::WizardController;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A wizard driven by a remote rendering layer
pub struct InterviewEntry {
    pub test_id: String,
    pub wizard: WizardController,
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active interviews (session_id → wizard)
    pub sessions: Arc<RwLock<HashMap<String, Arc<Mutex<InterviewEntry>>>>>,

    /// Where submitted interviews are sent
    pub submitter: Arc<dyn Submitter>,

    /// Candidate notifications
    pub hub: NotificationHub,
}

impl AppState {
    pub fn new(submitter: Arc<dyn Submitter>, hub: NotificationHub) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            submitter,
            hub,
        }
    }

    pub async fn session(&self, session_id: &str) -> Option<Arc<Mutex<InterviewEntry>>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

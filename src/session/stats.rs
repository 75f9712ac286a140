use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wizard::WizardSnapshot;

/// Progress of an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub test_id: String,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Time since the session was created, in seconds
    pub duration_secs: f64,

    /// Questions holding a clip
    pub recorded: usize,

    /// Questions explicitly skipped
    pub skipped: usize,

    /// Questions neither recorded nor skipped
    pub pending: usize,

    /// Capture attempts made per question, in question order
    pub capture_attempts: Vec<u32>,

    pub wizard: WizardSnapshot,
}

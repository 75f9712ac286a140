use serde::{Deserialize, Serialize};

/// Configuration for an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "interview-<uuid>")
    pub session_id: String,

    /// Test the answers are submitted against
    pub test_id: String,

    /// Extra capture attempts per question after the first one
    /// Default: 2
    pub retry_limit: u32,
}

impl SessionConfig {
    pub fn new(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("interview-{}", uuid::Uuid::new_v4()),
            test_id: String::new(),
            retry_limit: 2,
        }
    }
}

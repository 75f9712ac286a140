//! Interview session orchestration
//!
//! An `InterviewSession` ties one candidate's wizard to its collaborators:
//! - `Recorder` for capturing each answer (with a per-question retry limit)
//! - `Submitter` for handing the clips to the backend
//! - `NotificationHub` for surfacing progress and failures

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::InterviewSession;
pub use stats::SessionStats;

pub mod config;
pub mod http;
pub mod notify;
pub mod recorder;
pub mod scoring;
pub mod session;
pub mod submission;
pub mod wizard;

pub use config::Config;
pub use http::{create_router, AppState};
pub use notify::{NatsForwarder, Notification, NotificationHub, NotificationLevel, Subscription};
pub use recorder::{
    AudioBackend, AudioFrame, CaptureOutcome, CaptureRequest, FileRecorder, FrameRecorder,
    Recorder,
};
pub use scoring::{derive_traits, EmotionBreakdown, TraitInputs, TraitScores};
pub use session::{InterviewSession, SessionConfig, SessionStats};
pub use submission::{HttpSubmitter, SubmissionManifest, SubmissionReceipt, Submitter};
pub use wizard::{
    Clip, Question, RecordingSlot, SlotOutcome, Step, SubmissionStatus, WizardController,
    WizardError, WizardSnapshot,
};

use serde::{Deserialize, Serialize};

use super::question::{RecordingSlot, SlotOutcome};

/// Where the submission of a wizard stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    /// Waiting on the submission endpoint; further submits are rejected
    InFlight,
    /// Terminal
    Submitted,
}

/// Meaning of a step index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Introduction,
    /// Recording screen for the zero-based question index
    Question { index: usize },
    Review,
    Submitted,
}

/// Mutable state owned by a single `WizardController`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,

    /// One slot per question, in question order
    pub slots: Vec<RecordingSlot>,

    pub status: SubmissionStatus,
}

impl WizardState {
    pub fn new(slots: Vec<RecordingSlot>) -> Self {
        Self {
            current_step: 0,
            slots,
            status: SubmissionStatus::Idle,
        }
    }

    pub fn submitted(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }
}

/// Slot view for the rendering layer (no clip bytes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub question_id: String,

    /// "pending", "recorded" or "skipped"
    pub state: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl From<&RecordingSlot> for SlotSummary {
    fn from(slot: &RecordingSlot) -> Self {
        let (state, clip) = match &slot.outcome {
            SlotOutcome::Pending => ("pending", None),
            SlotOutcome::Recorded(clip) => ("recorded", Some(clip)),
            SlotOutcome::Skipped => ("skipped", None),
        };

        Self {
            question_id: slot.question_id.clone(),
            state: state.to_string(),
            content_type: clip.map(|c| c.content_type.clone()),
            size_bytes: clip.map(|c| c.len()),
            duration_ms: clip.and_then(|c| c.duration_ms),
        }
    }
}

/// Read-only view of a wizard, serialized for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub current_step: usize,
    pub total_steps: usize,
    pub step: Step,

    /// Whether "Next" should be enabled on the current step
    pub can_proceed: bool,

    pub submitted: bool,
    pub status: SubmissionStatus,
    pub slots: Vec<SlotSummary>,
}

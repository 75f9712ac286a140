use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wizard::{RecordingSlot, SlotOutcome};

/// Returned by a `Submitter` once the backend accepted the clips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the backend, if it returned one
    pub submission_id: Option<String>,
    pub test_id: String,
    pub clips_sent: usize,
    pub skipped: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Text parts sent alongside the clip parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionManifest {
    /// Every question id, in question order
    pub question_ids: Vec<String>,
    /// Questions with a clip part
    pub recorded: Vec<String>,
    pub skipped: Vec<String>,
    /// Questions never answered nor skipped
    pub unanswered: Vec<String>,
}

impl SubmissionManifest {
    pub fn from_slots(slots: &[RecordingSlot]) -> Self {
        let mut manifest = Self {
            question_ids: Vec::with_capacity(slots.len()),
            recorded: Vec::new(),
            skipped: Vec::new(),
            unanswered: Vec::new(),
        };

        for slot in slots {
            manifest.question_ids.push(slot.question_id.clone());
            match slot.outcome {
                SlotOutcome::Recorded(_) => manifest.recorded.push(slot.question_id.clone()),
                SlotOutcome::Skipped => manifest.skipped.push(slot.question_id.clone()),
                SlotOutcome::Pending => manifest.unanswered.push(slot.question_id.clone()),
            }
        }

        manifest
    }
}

/// Response body of the submissions endpoint
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmissionResponse {
    #[serde(default, alias = "id")]
    pub submission_id: Option<String>,
}

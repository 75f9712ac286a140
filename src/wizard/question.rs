use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An interview question, immutable for the lifetime of a wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier (also the multipart field name on submission)
    pub id: String,

    /// Prompt shown to the candidate
    pub prompt: String,

    /// Maximum recording length in seconds
    pub max_duration_secs: u64,
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, max_duration_secs: u64) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            max_duration_secs,
        }
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

/// A recorded answer
#[derive(Clone, PartialEq, Eq)]
pub struct Clip {
    /// Encoded media bytes
    pub data: Vec<u8>,

    /// MIME type, e.g. "audio/wav" or "video/webm"
    pub content_type: String,

    /// Measured duration, when the producer knows it
    pub duration_ms: Option<u64>,
}

impl Clip {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension matching the content type ("bin" when unknown)
    pub fn file_extension(&self) -> &'static str {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();

        match essence {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "video/webm" | "audio/webm" => "webm",
            "video/mp4" => "mp4",
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
            "audio/ogg" | "video/ogg" => "ogg",
            "audio/mpeg" => "mp3",
            _ => "bin",
        }
    }
}

// Clips can be megabytes; never dump the bytes into logs.
impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("bytes", &self.data.len())
            .field("content_type", &self.content_type)
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}

/// What happened to a question so far
///
/// A skipped slot never holds a clip, so "skipped with a clip" cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotOutcome {
    /// Not attempted yet
    #[default]
    Pending,
    Recorded(Clip),
    Skipped,
}

/// Per-question recording state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSlot {
    pub question_id: String,
    pub outcome: SlotOutcome,
}

impl RecordingSlot {
    pub fn new(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            outcome: SlotOutcome::Pending,
        }
    }

    pub fn clip(&self) -> Option<&Clip> {
        match &self.outcome {
            SlotOutcome::Recorded(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SlotOutcome::Skipped)
    }

    /// A slot is answered once it holds a clip or was explicitly skipped
    pub fn is_answered(&self) -> bool {
        !matches!(self.outcome, SlotOutcome::Pending)
    }
}

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::wizard::{Clip, Question};

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Parameters of a single capture for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub question_id: String,
    /// Recording is cut off at this length
    pub max_duration: Duration,
    /// 1-based attempt number for this question
    pub attempt: u32,
    /// Extra attempts allowed after the first
    pub retry_limit: u32,
}

impl CaptureRequest {
    pub fn for_question(question: &Question, attempt: u32, retry_limit: u32) -> Self {
        Self {
            question_id: question.id.clone(),
            max_duration: question.max_duration(),
            attempt,
            retry_limit,
        }
    }

    /// Attempts left after this one
    pub fn attempts_remaining(&self) -> u32 {
        (self.retry_limit + 1).saturating_sub(self.attempt)
    }
}

/// Result of a capture that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Clip(Clip),
    /// Candidate canceled, or nothing was captured
    NoClip,
}

/// Produces one clip per question
///
/// Device failures (camera or microphone unavailable, permission denied)
/// are returned as errors; the wizard slot is left untouched in that case.
#[async_trait::async_trait]
pub trait Recorder: Send + Sync {
    async fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureOutcome>;

    /// Recorder name for logging
    fn name(&self) -> &str;
}

/// Audio capture device feeding a `FrameRecorder`
///
/// Each `start` opens a fresh stream for one capture; `stop` releases the
/// device.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

// Shared test doubles for the wizard collaborators

#![allow(dead_code)]

use anyhow::Result;
use chrono::Utc;
use interview_wizard::recorder::{CaptureOutcome, CaptureRequest, Recorder};
use interview_wizard::submission::{SubmissionManifest, SubmissionReceipt, Submitter};
use interview_wizard::wizard::{Clip, Question, RecordingSlot};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question::new(format!("q{}", i + 1), format!("Question {}", i + 1), 60))
        .collect()
}

pub fn clip(tag: u8) -> Clip {
    Clip::new(vec![tag; 16], "video/webm")
}

/// Accepts every submission and remembers what it was sent
#[derive(Default)]
pub struct RecordingSubmitter {
    pub calls: AtomicUsize,
    pub last_slots: Mutex<Vec<RecordingSlot>>,
}

#[async_trait::async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, test_id: &str, slots: &[RecordingSlot]) -> Result<SubmissionReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_slots.lock().unwrap() = slots.to_vec();
        let manifest = SubmissionManifest::from_slots(slots);

        Ok(SubmissionReceipt {
            submission_id: Some("sub-1".to_string()),
            test_id: test_id.to_string(),
            clips_sent: manifest.recorded.len(),
            skipped: manifest.skipped.len(),
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Fails the first `failures` submissions, then accepts
pub struct FlakySubmitter {
    pub failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FlakySubmitter {
    pub fn new(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Submitter for FlakySubmitter {
    async fn submit(&self, test_id: &str, slots: &[RecordingSlot]) -> Result<SubmissionReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("Service returned error status 503: unavailable");
        }

        Ok(SubmissionReceipt {
            submission_id: None,
            test_id: test_id.to_string(),
            clips_sent: slots.iter().filter(|s| s.clip().is_some()).count(),
            skipped: slots.iter().filter(|s| s.is_skipped()).count(),
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Holds every submission until `release` is called, then accepts it
#[derive(Default)]
pub struct GatedSubmitter {
    pub calls: AtomicUsize,
    gate: Notify,
}

impl GatedSubmitter {
    /// Let one waiting (or the next) submission through
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Submitter for GatedSubmitter {
    async fn submit(&self, test_id: &str, slots: &[RecordingSlot]) -> Result<SubmissionReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        Ok(SubmissionReceipt {
            submission_id: Some("gated-1".to_string()),
            test_id: test_id.to_string(),
            clips_sent: slots.iter().filter(|s| s.clip().is_some()).count(),
            skipped: slots.iter().filter(|s| s.is_skipped()).count(),
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Replays a fixed list of capture results and records the requests
pub struct ScriptedRecorder {
    pub script: VecDeque<Result<CaptureOutcome>>,
    pub requests: Vec<CaptureRequest>,
}

impl ScriptedRecorder {
    pub fn new(script: Vec<Result<CaptureOutcome>>) -> Self {
        Self {
            script: script.into(),
            requests: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl Recorder for ScriptedRecorder {
    async fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureOutcome> {
        self.requests.push(request.clone());
        self.script
            .pop_front()
            .unwrap_or(Ok(CaptureOutcome::NoClip))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

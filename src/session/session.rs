use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::notify::{NotificationHub, NotificationLevel};
use crate::recorder::{CaptureOutcome, CaptureRequest, Recorder};
use crate::submission::{SubmissionReceipt, Submitter};
use crate::wizard::{Question, WizardController, WizardError, WizardSnapshot};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One candidate's pass through the interview wizard
pub struct InterviewSession {
    /// Session configuration
    config: SessionConfig,

    /// Step and slot state
    wizard: WizardController,

    /// Produces clips for questions
    recorder: Box<dyn Recorder>,

    /// Receives the finished slot sequence
    submitter: Arc<dyn Submitter>,

    /// Where progress and failures are reported
    hub: NotificationHub,

    /// Capture attempts per question
    attempts: Vec<u32>,

    /// When the session started
    started_at: chrono::DateTime<chrono::Utc>,
}

impl InterviewSession {
    /// Create a new session positioned on the introduction step
    pub fn new(
        config: SessionConfig,
        questions: Vec<Question>,
        recorder: Box<dyn Recorder>,
        submitter: Arc<dyn Submitter>,
        hub: NotificationHub,
    ) -> Result<Self> {
        info!(
            "Creating interview session {} for test {} ({} questions, recorder: {}, submitter: {})",
            config.session_id,
            config.test_id,
            questions.len(),
            recorder.name(),
            submitter.name()
        );

        let wizard = WizardController::new(questions).context("Failed to create wizard")?;
        let attempts = vec![0; wizard.questions().len()];

        Ok(Self {
            config,
            wizard,
            recorder,
            submitter,
            hub,
            attempts,
            started_at: Utc::now(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    /// Current wizard view for the rendering layer
    pub fn snapshot(&self) -> WizardSnapshot {
        self.wizard.snapshot()
    }

    pub fn attempts(&self, question_index: usize) -> u32 {
        self.attempts.get(question_index).copied().unwrap_or(0)
    }

    /// Record an answer for a question through the recorder
    ///
    /// A clip is stored in the question's slot. `NoClip` and recorder
    /// failures leave the slot as it was. Never changes the step.
    pub async fn capture_answer(&mut self, question_index: usize) -> Result<CaptureOutcome> {
        if self.wizard.submitted() {
            return Err(WizardError::AlreadySubmitted.into());
        }

        let question = self
            .wizard
            .question(question_index)
            .cloned()
            .ok_or(WizardError::QuestionOutOfRange {
                index: question_index,
                count: self.wizard.questions().len(),
            })?;

        let used = self.attempts[question_index];
        if used > self.config.retry_limit {
            warn!(
                "Retry limit reached for question {} ({} attempts)",
                question.id, used
            );
            self.notify(
                NotificationLevel::Warning,
                "No attempts left",
                format!(
                    "You have used all {} attempts for this question. Keep your last answer or skip it.",
                    used
                ),
            );
            anyhow::bail!("Retry limit reached for question {}", question.id);
        }

        self.attempts[question_index] = used + 1;
        let request = CaptureRequest::for_question(&question, used + 1, self.config.retry_limit);

        match self.recorder.capture(&request).await {
            Ok(CaptureOutcome::Clip(clip)) => {
                self.wizard.record_answer(question_index, clip.clone())?;
                self.notify(
                    NotificationLevel::Success,
                    "Answer recorded",
                    format!(
                        "Your answer was saved. Attempts remaining: {}.",
                        request.attempts_remaining()
                    ),
                );
                Ok(CaptureOutcome::Clip(clip))
            }
            Ok(CaptureOutcome::NoClip) => {
                info!("Capture for {} ended without a clip", question.id);
                self.notify(
                    NotificationLevel::Info,
                    "Nothing recorded",
                    "No answer was captured. You can try again or skip the question.",
                );
                Ok(CaptureOutcome::NoClip)
            }
            Err(e) => {
                error!("Recorder failed for {}: {:#}", question.id, e);
                self.notify(
                    NotificationLevel::Error,
                    "Recording failed",
                    format!("{:#}", e),
                );
                Err(e.context(format!("Failed to record question {}", question.id)))
            }
        }
    }

    /// Skip a question and move on; returns whether the step moved
    pub fn skip_answer(&mut self, question_index: usize) -> Result<bool> {
        Ok(self.wizard.skip_answer(question_index)?)
    }

    pub fn advance(&mut self) -> bool {
        self.wizard.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.wizard.retreat()
    }

    /// Submit every slot; the session is terminal after success
    pub async fn submit(&mut self) -> Result<SubmissionReceipt> {
        let submitter = Arc::clone(&self.submitter);

        match self
            .wizard
            .submit(submitter.as_ref(), &self.config.test_id)
            .await
        {
            Ok(receipt) => {
                info!(
                    "Session {} submitted ({} clips)",
                    self.config.session_id, receipt.clips_sent
                );
                self.notify(
                    NotificationLevel::Success,
                    "Interview submitted",
                    "Thank you! Your answers have been submitted.",
                );
                Ok(receipt)
            }
            Err(e) => {
                if let WizardError::SubmissionFailed(reason) = &e {
                    self.notify(
                        NotificationLevel::Error,
                        "Submission failed",
                        format!("{}. Please try again.", reason),
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Get current session statistics
    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let slots = self.wizard.slots();
        let recorded = slots.iter().filter(|s| s.clip().is_some()).count();
        let skipped = slots.iter().filter(|s| s.is_skipped()).count();

        SessionStats {
            session_id: self.config.session_id.clone(),
            test_id: self.config.test_id.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            recorded,
            skipped,
            pending: slots.len() - recorded - skipped,
            capture_attempts: self.attempts.clone(),
            wizard: self.wizard.snapshot(),
        }
    }

    fn notify(&self, level: NotificationLevel, title: &str, message: impl Into<String>) {
        self.hub
            .notify(Some(&self.config.session_id), level, title, message);
    }
}

use tracing::{debug, info, warn};

use super::error::{WizardError, WizardResult};
use super::question::{Clip, Question, RecordingSlot, SlotOutcome};
use super::state::{SlotSummary, Step, SubmissionStatus, WizardSnapshot, WizardState};
use crate::submission::{SubmissionReceipt, Submitter};

/// Drives one candidate through the recording wizard
///
/// Owns the step index, one `RecordingSlot` per question and the submission
/// status. All mutations go through `&mut self`; callers that share a
/// controller across tasks wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct WizardController {
    questions: Vec<Question>,
    state: WizardState,
}

impl WizardController {
    /// Create a wizard positioned on the introduction step
    pub fn new(questions: Vec<Question>) -> WizardResult<Self> {
        if questions.is_empty() {
            return Err(WizardError::NoQuestions);
        }

        let slots = questions
            .iter()
            .map(|q| RecordingSlot::new(q.id.clone()))
            .collect();

        debug!("Wizard created with {} questions", questions.len());

        Ok(Self {
            questions,
            state: WizardState::new(slots),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.questions.len() + 2
    }

    pub fn review_step(&self) -> usize {
        self.total_steps() - 1
    }

    pub fn slots(&self) -> &[RecordingSlot] {
        &self.state.slots
    }

    pub fn slot(&self, index: usize) -> Option<&RecordingSlot> {
        self.state.slots.get(index)
    }

    pub fn submitted(&self) -> bool {
        self.state.submitted()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.status
    }

    /// What the rendering layer should show right now
    pub fn step(&self) -> Step {
        if self.submitted() {
            return Step::Submitted;
        }
        // current_step is always within range
        self.step_kind(self.state.current_step).unwrap_or(Step::Review)
    }

    /// Meaning of an arbitrary step index, `None` when out of range
    pub fn step_kind(&self, step: usize) -> Option<Step> {
        match step {
            0 => Some(Step::Introduction),
            s if s == self.review_step() => Some(Step::Review),
            s if s < self.review_step() => Some(Step::Question { index: s - 1 }),
            _ => None,
        }
    }

    /// Whether forward navigation is allowed from `step`
    ///
    /// Introduction and review always allow it; a question step requires its
    /// slot to hold a clip or to be skipped.
    pub fn can_proceed(&self, step: usize) -> bool {
        match self.step_kind(step) {
            Some(Step::Introduction) | Some(Step::Review) => true,
            Some(Step::Question { index }) => self.state.slots[index].is_answered(),
            Some(Step::Submitted) | None => false,
        }
    }

    /// Move to the next step; returns whether the step changed
    pub fn advance(&mut self) -> bool {
        if self.state.status != SubmissionStatus::Idle {
            return false;
        }

        let current = self.state.current_step;
        if !self.can_proceed(current) {
            debug!("Advance refused at step {}: question not answered", current);
            return false;
        }

        if current < self.review_step() {
            self.state.current_step += 1;
            debug!("Advanced to step {}", self.state.current_step);
            true
        } else {
            false
        }
    }

    /// Move to the previous step; returns whether the step changed
    pub fn retreat(&mut self) -> bool {
        if self.state.status != SubmissionStatus::Idle {
            return false;
        }

        if self.state.current_step > 0 {
            self.state.current_step -= 1;
            debug!("Retreated to step {}", self.state.current_step);
            true
        } else {
            false
        }
    }

    /// Store a clip for a question, replacing any earlier attempt
    ///
    /// Does not change the current step.
    pub fn record_answer(&mut self, question_index: usize, clip: Clip) -> WizardResult<()> {
        self.ensure_mutable()?;
        let count = self.questions.len();
        let slot = self
            .state
            .slots
            .get_mut(question_index)
            .ok_or(WizardError::QuestionOutOfRange {
                index: question_index,
                count,
            })?;

        if let SlotOutcome::Recorded(previous) = &slot.outcome {
            debug!(
                "Replacing clip for question {} ({} bytes)",
                slot.question_id,
                previous.len()
            );
        }

        info!(
            "Recorded answer for question {} ({} bytes, {})",
            slot.question_id,
            clip.len(),
            clip.content_type
        );
        slot.outcome = SlotOutcome::Recorded(clip);

        Ok(())
    }

    /// Mark a question as skipped, then advance
    ///
    /// Returns whether the advance moved the step.
    pub fn skip_answer(&mut self, question_index: usize) -> WizardResult<bool> {
        self.ensure_mutable()?;
        let count = self.questions.len();
        let slot = self
            .state
            .slots
            .get_mut(question_index)
            .ok_or(WizardError::QuestionOutOfRange {
                index: question_index,
                count,
            })?;

        info!("Skipped question {}", slot.question_id);
        slot.outcome = SlotOutcome::Skipped;

        Ok(self.advance())
    }

    /// Start a submission and hand back the slots to send
    ///
    /// Only valid from the review step. Until `complete_submission` is called
    /// every other submit is rejected with `SubmissionInFlight`.
    pub fn begin_submission(&mut self) -> WizardResult<Vec<RecordingSlot>> {
        match self.state.status {
            SubmissionStatus::Submitted => return Err(WizardError::AlreadySubmitted),
            SubmissionStatus::InFlight => return Err(WizardError::SubmissionInFlight),
            SubmissionStatus::Idle => {}
        }

        if self.state.current_step != self.review_step() {
            return Err(WizardError::NotOnReviewStep {
                current: self.state.current_step,
                review: self.review_step(),
            });
        }

        self.state.status = SubmissionStatus::InFlight;
        info!("Submission started ({} slots)", self.state.slots.len());

        Ok(self.state.slots.clone())
    }

    /// Finish the submission started by `begin_submission`
    ///
    /// An accepted submission is terminal; a rejected one returns the wizard
    /// to the review step so the candidate can retry.
    pub fn complete_submission(&mut self, accepted: bool) {
        if self.state.status != SubmissionStatus::InFlight {
            warn!(
                "Ignoring submission result, no submission in flight (status {:?})",
                self.state.status
            );
            return;
        }

        if accepted {
            self.state.status = SubmissionStatus::Submitted;
            info!("Submission accepted");
        } else {
            self.state.status = SubmissionStatus::Idle;
            warn!("Submission rejected, wizard back on review step");
        }
    }

    /// Send every slot through `submitter` and mark the wizard submitted on
    /// success
    pub async fn submit(
        &mut self,
        submitter: &dyn Submitter,
        test_id: &str,
    ) -> WizardResult<SubmissionReceipt> {
        let slots = self.begin_submission()?;
        let guard = SubmissionGuard {
            wizard: self,
            finished: false,
        };

        match submitter.submit(test_id, &slots).await {
            Ok(receipt) => {
                guard.finish(true);
                Ok(receipt)
            }
            Err(e) => {
                guard.finish(false);
                Err(WizardError::SubmissionFailed(format!("{:#}", e)))
            }
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            current_step: self.state.current_step,
            total_steps: self.total_steps(),
            step: self.step(),
            can_proceed: !self.submitted() && self.can_proceed(self.state.current_step),
            submitted: self.submitted(),
            status: self.state.status,
            slots: self.state.slots.iter().map(SlotSummary::from).collect(),
        }
    }

    fn ensure_mutable(&self) -> WizardResult<()> {
        match self.state.status {
            SubmissionStatus::Idle => Ok(()),
            SubmissionStatus::InFlight => Err(WizardError::SubmissionInFlight),
            SubmissionStatus::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }
}

/// Returns the wizard to the review step if `submit` is dropped before the
/// endpoint answers
struct SubmissionGuard<'a> {
    wizard: &'a mut WizardController,
    finished: bool,
}

impl SubmissionGuard<'_> {
    fn finish(mut self, accepted: bool) {
        self.finished = true;
        self.wizard.complete_submission(accepted);
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Submission abandoned before the endpoint answered");
            self.wizard.complete_submission(false);
        }
    }
}

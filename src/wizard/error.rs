use thiserror::Error;

pub type WizardResult<T> = std::result::Result<T, WizardError>;

/// Errors raised by the wizard controller
///
/// Refused navigation (`advance` while the current question is unanswered)
/// is not an error; it is reported through the returned `bool`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("An interview needs at least one question")]
    NoQuestions,

    #[error("Question index {index} is out of range ({count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Interview has already been submitted")]
    AlreadySubmitted,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Submission is only possible from the review step (current step {current}, review step {review})")]
    NotOnReviewStep { current: usize, review: usize },

    /// The submission collaborator rejected the clips or could not be reached
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

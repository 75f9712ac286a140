//! Interview wizard state machine
//!
//! For an interview with `N` questions the wizard has `N + 2` steps:
//! - step 0: introduction
//! - steps 1..=N: recording screen for question `step - 1`
//! - step N+1: review / submit
//!
//! Submitting from the review step moves the wizard into a terminal
//! `Submitted` state where slots can no longer change.

mod controller;
mod error;
mod question;
mod state;

pub use controller::WizardController;
pub use error::{WizardError, WizardResult};
pub use question::{Clip, Question, RecordingSlot, SlotOutcome};
pub use state::{SlotSummary, Step, SubmissionStatus, WizardSnapshot, WizardState};

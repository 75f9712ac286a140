//! Submission collaborator
//!
//! Hands the collected recording slots to the interview backend:
//! - `Submitter` trait: the network boundary seen by the wizard
//! - `HttpSubmitter`: multipart upload, one binary part per recorded question

mod client;
pub mod messages;

pub use client::{HttpSubmitter, Submitter};
pub use messages::{SubmissionManifest, SubmissionReceipt};

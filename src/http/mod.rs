//! HTTP API for the rendering layer
//!
//! This module exposes interview wizards over REST:
//! - POST /interviews - Create a wizard for a question set
//! - GET /interviews/:id - Current step, slots and submission status
//! - POST /interviews/:id/advance, /retreat - Step navigation
//! - PUT /interviews/:id/answers/:index - Store a recorded clip
//! - POST /interviews/:id/answers/:index/skip - Skip a question
//! - POST /interviews/:id/submit - Submit from the review step
//! - DELETE /interviews/:id - Drop a wizard
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{
    CreateInterviewRequest, ErrorResponse, InterviewResponse, RecordAnswerRequest, SubmitResponse,
};
pub use routes::create_router;
pub use state::{AppState, InterviewEntry};

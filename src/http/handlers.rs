use super::state::{AppState, InterviewEntry};
use crate::notify::NotificationLevel;
use crate::submission::SubmissionReceipt;
use crate::wizard::{Clip, Question, RecordingSlot, WizardController, WizardError, WizardSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Test the answers belong to
    pub test_id: String,

    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnswerRequest {
    /// MIME type of the clip, e.g. "video/webm"
    pub content_type: String,

    /// Base64-encoded clip bytes
    pub data: String,

    pub duration_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterviewResponse {
    pub session_id: String,
    pub test_id: String,

    /// Whether a navigation request changed the step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<bool>,

    pub wizard: WizardSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub session_id: String,
    pub receipt: SubmissionReceipt,
    pub wizard: WizardSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn wizard_error_response(e: &WizardError) -> Response {
    let status = match e {
        WizardError::NoQuestions | WizardError::QuestionOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        WizardError::AlreadySubmitted
        | WizardError::SubmissionInFlight
        | WizardError::NotOnReviewStep { .. } => StatusCode::CONFLICT,
        WizardError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, e.to_string())
}

fn not_found(session_id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Interview {} not found", session_id),
    )
}

fn interview_response(
    session_id: &str,
    entry: &InterviewEntry,
    moved: Option<bool>,
) -> InterviewResponse {
    InterviewResponse {
        session_id: session_id.to_string(),
        test_id: entry.test_id.clone(),
        moved,
        wizard: entry.wizard.snapshot(),
    }
}

async fn find_session(
    state: &AppState,
    session_id: &str,
) -> Result<Arc<Mutex<InterviewEntry>>, Response> {
    state.session(session_id).await.ok_or_else(|| not_found(session_id))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interviews
/// Create a wizard positioned on the introduction step
pub async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("interview-{}", uuid::Uuid::new_v4()));

    let wizard = match WizardController::new(req.questions) {
        Ok(w) => w,
        Err(e) => return wizard_error_response(&e),
    };

    let entry = InterviewEntry {
        test_id: req.test_id,
        wizard,
    };
    let response = interview_response(&session_id, &entry, None);

    {
        let mut sessions = state.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return error_response(
                StatusCode::CONFLICT,
                format!("Interview {} already exists", session_id),
            );
        }
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(entry)));
    }

    info!(
        "Interview {} created for test {} ({} steps)",
        session_id, response.test_id, response.wizard.total_steps
    );

    (StatusCode::CREATED, Json(response)).into_response()
}

/// GET /interviews/:session_id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let entry = session.lock().await;
    (
        StatusCode::OK,
        Json(interview_response(&session_id, &entry, None)),
    )
        .into_response()
}

/// POST /interviews/:session_id/advance
/// Refused navigation is reported through `moved: false`
pub async fn advance_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut entry = session.lock().await;
    let moved = entry.wizard.advance();
    (
        StatusCode::OK,
        Json(interview_response(&session_id, &entry, Some(moved))),
    )
        .into_response()
}

/// POST /interviews/:session_id/retreat
pub async fn retreat_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut entry = session.lock().await;
    let moved = entry.wizard.retreat();
    (
        StatusCode::OK,
        Json(interview_response(&session_id, &entry, Some(moved))),
    )
        .into_response()
}

/// PUT /interviews/:session_id/answers/:index
/// Store (or replace) the clip for a question
pub async fn record_answer(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
    Json(req): Json<RecordAnswerRequest>,
) -> impl IntoResponse {
    let data = match base64::engine::general_purpose::STANDARD.decode(req.data.as_bytes()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Rejected clip for {}: invalid base64: {}", session_id, e);
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Clip data is not valid base64: {}", e),
            );
        }
    };

    if data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Clip data is empty");
    }

    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut clip = Clip::new(data, req.content_type);
    clip.duration_ms = req.duration_ms;

    let mut entry = session.lock().await;
    if let Err(e) = entry.wizard.record_answer(index, clip) {
        return wizard_error_response(&e);
    }

    (
        StatusCode::OK,
        Json(interview_response(&session_id, &entry, None)),
    )
        .into_response()
}

/// POST /interviews/:session_id/answers/:index/skip
pub async fn skip_answer(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
) -> impl IntoResponse {
    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut entry = session.lock().await;
    match entry.wizard.skip_answer(index) {
        Ok(moved) => (
            StatusCode::OK,
            Json(interview_response(&session_id, &entry, Some(moved))),
        )
            .into_response(),
        Err(e) => wizard_error_response(&e),
    }
}

/// POST /interviews/:session_id/submit
/// Hand every slot to the submission endpoint
///
/// The wizard lock is not held while the endpoint responds; the in-flight
/// status rejects concurrent submits instead. The upload runs in its own
/// task, so a client that disconnects does not leave the wizard in flight.
pub async fn submit_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = match find_session(&state, &session_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let (test_id, slots) = {
        let mut entry = session.lock().await;
        match entry.wizard.begin_submission() {
            Ok(slots) => (entry.test_id.clone(), slots),
            Err(e) => return wizard_error_response(&e),
        }
    };

    info!("Submitting interview {} for test {}", session_id, test_id);

    let task = tokio::spawn(run_submission(
        state.clone(),
        session.clone(),
        session_id.clone(),
        test_id,
        slots,
    ));

    match task.await {
        Ok(Ok((receipt, wizard))) => (
            StatusCode::OK,
            Json(SubmitResponse {
                session_id,
                receipt,
                wizard,
            }),
        )
            .into_response(),
        Ok(Err(e)) => wizard_error_response(&e),
        Err(e) => {
            error!("Submission task for interview {} failed: {}", session_id, e);
            session.lock().await.wizard.complete_submission(false);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Submission task failed")
        }
    }
}

/// Upload the slots and record the outcome on the wizard
async fn run_submission(
    state: AppState,
    session: Arc<Mutex<InterviewEntry>>,
    session_id: String,
    test_id: String,
    slots: Vec<RecordingSlot>,
) -> Result<(SubmissionReceipt, WizardSnapshot), WizardError> {
    let result = state.submitter.submit(&test_id, &slots).await;

    let mut entry = session.lock().await;
    match result {
        Ok(receipt) => {
            entry.wizard.complete_submission(true);
            state.hub.notify(
                Some(&session_id),
                NotificationLevel::Success,
                "Interview submitted",
                "Thank you! Your answers have been submitted.",
            );
            info!("Interview {} submitted", session_id);
            Ok((receipt, entry.wizard.snapshot()))
        }
        Err(e) => {
            entry.wizard.complete_submission(false);
            error!("Submission failed for interview {}: {:#}", session_id, e);
            state.hub.notify(
                Some(&session_id),
                NotificationLevel::Error,
                "Submission failed",
                format!("{:#}. Please try again.", e),
            );
            Err(WizardError::SubmissionFailed(format!("{:#}", e)))
        }
    }
}

/// DELETE /interviews/:session_id
pub async fn delete_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let removed = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match removed {
        Some(_) => {
            info!("Interview {} removed", session_id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

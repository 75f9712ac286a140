// Tests for the submission manifest and HTTP submitter

use interview_wizard::config::SubmissionSettings;
use interview_wizard::submission::{HttpSubmitter, SubmissionManifest, SubmissionReceipt, Submitter};
use interview_wizard::wizard::{Clip, RecordingSlot, SlotOutcome};
use std::time::Duration;

fn slots() -> Vec<RecordingSlot> {
    vec![
        RecordingSlot {
            question_id: "q1".to_string(),
            outcome: SlotOutcome::Recorded(Clip::new(vec![1, 2, 3], "video/webm")),
        },
        RecordingSlot {
            question_id: "q2".to_string(),
            outcome: SlotOutcome::Skipped,
        },
        RecordingSlot::new("q3"),
    ]
}

#[test]
fn test_manifest_from_slots() {
    let manifest = SubmissionManifest::from_slots(&slots());

    assert_eq!(manifest.question_ids, ["q1", "q2", "q3"]);
    assert_eq!(manifest.recorded, ["q1"]);
    assert_eq!(manifest.skipped, ["q2"]);
    assert_eq!(manifest.unanswered, ["q3"]);
}

#[test]
fn test_clip_file_extension() {
    assert_eq!(Clip::new(vec![], "video/webm;codecs=vp9,opus").file_extension(), "webm");
    assert_eq!(Clip::new(vec![], "audio/wav").file_extension(), "wav");
    assert_eq!(Clip::new(vec![], "audio/mp4").file_extension(), "m4a");
    assert_eq!(Clip::new(vec![], "application/x-unknown").file_extension(), "bin");
}

#[test]
fn test_clip_debug_omits_bytes() {
    let clip = Clip::new(vec![42; 1024], "video/webm");
    let debug = format!("{:?}", clip);

    assert!(debug.contains("bytes: 1024"));
    assert!(!debug.contains("42, 42"));
}

#[test]
fn test_submissions_url() {
    let submitter = HttpSubmitter::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();

    assert_eq!(
        submitter.submissions_url("test-7").unwrap().as_str(),
        "http://localhost:8000/api/tests/test-7/submissions"
    );
    assert_eq!(submitter.name(), "http");
}

#[test]
fn test_submitter_from_settings() {
    let settings = SubmissionSettings {
        base_url: "https://hr.example.com".to_string(),
        timeout_secs: 30,
    };

    let submitter = HttpSubmitter::from_settings(&settings).unwrap();
    assert_eq!(
        submitter.submissions_url("t").unwrap().as_str(),
        "https://hr.example.com/tests/t/submissions"
    );
}

#[test]
fn test_submissions_url_escapes_test_id() {
    let submitter = HttpSubmitter::new("http://h/api", Duration::from_secs(5)).unwrap();

    let url = submitter.submissions_url("../../admin/wipe?x=#frag").unwrap();
    assert_eq!(url.host_str(), Some("h"));
    assert!(url.path().starts_with("/api/tests/"));
    assert!(url.path().ends_with("/submissions"));
    assert_eq!(url.path_segments().unwrap().count(), 4);
    assert!(url.query().is_none());
    assert!(url.fragment().is_none());
    assert!(url.as_str().contains("%2F"));

    assert!(submitter.submissions_url("..").is_err());
    assert!(submitter.submissions_url("").is_err());
}

#[test]
fn test_submitter_rejects_invalid_base_url() {
    assert!(HttpSubmitter::new("not a url", Duration::from_secs(5)).is_err());
    assert!(HttpSubmitter::new("mailto:hr@example.com", Duration::from_secs(5)).is_err());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_error() {
    // Grab a free port, then release it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let submitter = HttpSubmitter::new(format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap();

    let result = submitter.submit("test-1", &slots()).await;
    assert!(result.is_err());
}

#[test]
fn test_receipt_serialization() {
    let json = r#"{
        "submission_id": "abc",
        "test_id": "test-1",
        "clips_sent": 2,
        "skipped": 1,
        "submitted_at": "2026-10-19T10:00:00Z"
    }"#;

    let receipt: SubmissionReceipt = serde_json::from_str(json).unwrap();
    assert_eq!(receipt.submission_id.as_deref(), Some("abc"));
    assert_eq!(receipt.clips_sent, 2);
}

#[tokio::test]
async fn test_multipart_upload_to_endpoint() {
    use axum::extract::{Multipart, Path};
    use axum::{routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    // (field name, file name, content type, body or text value)
    type Parts = Arc<Mutex<Vec<(String, Option<String>, Option<String>, Vec<u8>)>>>;
    let parts: Parts = Arc::new(Mutex::new(Vec::new()));
    let seen = parts.clone();

    let app = Router::new().route(
        "/tests/:test_id/submissions",
        post(move |Path(test_id): Path<String>, mut multipart: Multipart| {
            let seen = seen.clone();
            async move {
                assert_eq!(test_id, "test-1");
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.unwrap().to_vec();
                    seen.lock().unwrap().push((name, file_name, content_type, bytes));
                }
                Json(serde_json::json!({ "id": "srv-1" }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let submitter = HttpSubmitter::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let receipt = submitter.submit("test-1", &slots()).await.unwrap();

    assert_eq!(receipt.submission_id.as_deref(), Some("srv-1"));
    assert_eq!(receipt.clips_sent, 1);
    assert_eq!(receipt.skipped, 1);

    let parts = parts.lock().unwrap();
    let clip = parts.iter().find(|p| p.0 == "q1").expect("clip part");
    assert_eq!(clip.1.as_deref(), Some("q1.webm"));
    assert_eq!(clip.2.as_deref(), Some("video/webm"));
    assert_eq!(clip.3, vec![1, 2, 3]);

    let skipped = parts.iter().find(|p| p.0 == "skipped").expect("skipped part");
    assert_eq!(skipped.3, br#"["q2"]"#.to_vec());

    let manifest = parts.iter().find(|p| p.0 == "manifest").expect("manifest part");
    assert_eq!(manifest.3, br#"["q1","q2","q3"]"#.to_vec());

    assert!(parts.iter().all(|p| p.0 != "q2" && p.0 != "q3"));
}

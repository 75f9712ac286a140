use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::{error, info};

use super::messages::{SubmissionManifest, SubmissionReceipt, SubmissionResponse};
use crate::config::SubmissionSettings;
use crate::wizard::RecordingSlot;

/// Network boundary that accepts a candidate's recorded answers
///
/// Implementations:
/// - `HttpSubmitter`: multipart POST to the interview backend
/// - test doubles in `tests/`
#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Send the full, ordered slot sequence for `test_id`
    async fn submit(&self, test_id: &str, slots: &[RecordingSlot]) -> Result<SubmissionReceipt>;

    /// Submitter name for logging
    fn name(&self) -> &str;
}

/// Uploads clips as `multipart/form-data` to `{base_url}/tests/{test_id}/submissions`
pub struct HttpSubmitter {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSubmitter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid submission base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Submission base URL {} cannot carry a path", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
        })
    }

    pub fn from_settings(settings: &SubmissionSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// `test_id` is a single percent-encoded path segment
    pub fn submissions_url(&self, test_id: &str) -> Result<Url> {
        if test_id.is_empty() || test_id == "." || test_id == ".." {
            anyhow::bail!("Invalid test id {:?}", test_id);
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Submission base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .push("tests")
            .push(test_id)
            .push("submissions");
        Ok(url)
    }

    /// One binary part per recorded slot, named by question id, plus the
    /// `manifest` and `skipped` text parts
    fn build_form(slots: &[RecordingSlot], manifest: &SubmissionManifest) -> Result<Form> {
        let mut form = Form::new()
            .text(
                "manifest",
                serde_json::to_string(&manifest.question_ids)
                    .context("Failed to encode manifest")?,
            )
            .text(
                "skipped",
                serde_json::to_string(&manifest.skipped).context("Failed to encode skip list")?,
            );

        for slot in slots {
            if let Some(clip) = slot.clip() {
                let part = Part::bytes(clip.data.clone())
                    .file_name(format!("{}.{}", slot.question_id, clip.file_extension()))
                    .mime_str(&clip.content_type)
                    .with_context(|| {
                        format!("Invalid content type for question {}", slot.question_id)
                    })?;
                form = form.part(slot.question_id.clone(), part);
            }
        }

        Ok(form)
    }
}

#[async_trait::async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, test_id: &str, slots: &[RecordingSlot]) -> Result<SubmissionReceipt> {
        let url = self.submissions_url(test_id)?;
        let manifest = SubmissionManifest::from_slots(slots);
        let form = Self::build_form(slots, &manifest)?;

        info!(
            "Submitting {} clips ({} skipped) to {}",
            manifest.recorded.len(),
            manifest.skipped.len(),
            url
        );

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .context("Submission request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::new());

        if !status.is_success() {
            error!("Submission endpoint returned {}: {}", status, body);
            anyhow::bail!("Submission endpoint returned {}: {}", status, body);
        }

        // The backend may answer with an empty body
        let parsed: SubmissionResponse = serde_json::from_str(&body).unwrap_or_default();

        info!(
            "Submission accepted for test {} (id: {})",
            test_id,
            parsed.submission_id.as_deref().unwrap_or("none")
        );

        Ok(SubmissionReceipt {
            submission_id: parsed.submission_id,
            test_id: test_id.to_string(),
            clips_sent: manifest.recorded.len(),
            skipped: manifest.skipped.len(),
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

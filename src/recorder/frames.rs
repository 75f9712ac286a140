use anyhow::{Context, Result};
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::{AudioBackend, AudioFrame, CaptureOutcome, CaptureRequest, Recorder};
use crate::wizard::Clip;

pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Records answers from an audio backend into in-memory WAV clips
///
/// A capture reads frames until the backend closes its stream or the
/// question's maximum duration is reached, whichever comes first. The
/// duration is measured both by frame timestamps (relative to the first
/// frame) and by the number of samples kept.
pub struct FrameRecorder {
    backend: Box<dyn AudioBackend>,
}

impl FrameRecorder {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait::async_trait]
impl Recorder for FrameRecorder {
    async fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureOutcome> {
        info!(
            "Capturing answer for {} with {} (attempt {}, max {:?})",
            request.question_id,
            self.backend.name(),
            request.attempt,
            request.max_duration
        );

        let mut frames_rx = self
            .backend
            .start()
            .await
            .context("Failed to start audio capture")?;

        let mut writer: Option<ClipWriter> = None;

        while let Some(frame) = frames_rx.recv().await {
            let writer = writer.get_or_insert_with(|| ClipWriter::new(&frame, request.max_duration));

            if !writer.matches_format(&frame) {
                warn!(
                    "Dropping frame with mismatched format ({}Hz/{}ch)",
                    frame.sample_rate, frame.channels
                );
                continue;
            }

            if writer.past_deadline(&frame) {
                debug!(
                    "Frame at {}ms is past the limit for {}",
                    frame.timestamp_ms, request.question_id
                );
                break;
            }

            if writer.push(&frame) {
                debug!("Maximum duration reached for {}", request.question_id);
                break;
            }
        }

        if self.backend.is_capturing() {
            if let Err(e) = self.backend.stop().await {
                warn!("Failed to stop audio backend: {}", e);
            }
        }

        match writer {
            Some(writer) if writer.sample_count() > 0 => {
                let clip = writer.finish()?;
                info!(
                    "Captured {} ({} bytes, {:?} ms)",
                    request.question_id,
                    clip.len(),
                    clip.duration_ms
                );
                Ok(CaptureOutcome::Clip(clip))
            }
            _ => {
                info!("No audio captured for {}", request.question_id);
                Ok(CaptureOutcome::NoClip)
            }
        }
    }

    fn name(&self) -> &str {
        self.backend.name()
    }
}

/// Accumulates samples in the first frame's format, capped at a duration
struct ClipWriter {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    max_samples: usize,
    first_timestamp_ms: u64,
    max_ms: u64,
}

impl ClipWriter {
    fn new(first: &AudioFrame, max_duration: Duration) -> Self {
        let per_second = first.sample_rate as u128 * first.channels as u128;
        let max_samples = (per_second * max_duration.as_millis() / 1000) as usize;

        Self {
            samples: Vec::new(),
            sample_rate: first.sample_rate,
            channels: first.channels,
            max_samples,
            first_timestamp_ms: first.timestamp_ms,
            max_ms: max_duration.as_millis() as u64,
        }
    }

    /// Whether the frame starts at or beyond the maximum duration
    fn past_deadline(&self, frame: &AudioFrame) -> bool {
        frame.timestamp_ms.saturating_sub(self.first_timestamp_ms) >= self.max_ms
    }

    fn matches_format(&self, frame: &AudioFrame) -> bool {
        frame.sample_rate == self.sample_rate && frame.channels == self.channels
    }

    /// Append a frame; returns true once the cap is reached
    fn push(&mut self, frame: &AudioFrame) -> bool {
        let room = self.max_samples.saturating_sub(self.samples.len());
        let take = room.min(frame.samples.len());
        self.samples.extend_from_slice(&frame.samples[..take]);
        self.samples.len() >= self.max_samples
    }

    fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn finish(self) -> Result<Clip> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer =
                hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }
            writer.finalize().context("Failed to finalize WAV clip")?;
        }

        let frames = self.samples.len() as u64 / self.channels.max(1) as u64;
        let duration = Duration::from_millis(frames * 1000 / self.sample_rate.max(1) as u64);

        Ok(Clip::new(cursor.into_inner(), WAV_CONTENT_TYPE).with_duration(duration))
    }
}

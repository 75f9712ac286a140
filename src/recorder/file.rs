use anyhow::{Context, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use super::backend::{CaptureOutcome, CaptureRequest, Recorder};
use crate::wizard::Clip;

/// Extensions looked up for a question's clip, with their MIME types
const CLIP_EXTENSIONS: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("webm", "video/webm"),
    ("mp4", "video/mp4"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("mp3", "audio/mpeg"),
];

/// Serves pre-recorded answers from `<dir>/<question_id>.<ext>`
///
/// A question without a file yields `NoClip`. Clips longer than the
/// question's maximum duration are rejected.
pub struct FileRecorder {
    clips_dir: PathBuf,
}

impl FileRecorder {
    pub fn new(clips_dir: impl Into<PathBuf>) -> Self {
        Self {
            clips_dir: clips_dir.into(),
        }
    }

    /// Path and MIME type of the clip for a question, if one exists
    pub fn find_clip(&self, question_id: &str) -> Option<(PathBuf, &'static str)> {
        CLIP_EXTENSIONS.iter().find_map(|(ext, mime)| {
            let path = self.clips_dir.join(format!("{}.{}", question_id, ext));
            path.is_file().then_some((path, *mime))
        })
    }
}

#[async_trait::async_trait]
impl Recorder for FileRecorder {
    async fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureOutcome> {
        let Some((path, content_type)) = self.find_clip(&request.question_id) else {
            info!(
                "No clip for {} in {}",
                request.question_id,
                self.clips_dir.display()
            );
            return Ok(CaptureOutcome::NoClip);
        };

        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read clip: {}", path.display()))?;

        let duration = probe_duration(&data, &path)
            .with_context(|| format!("Failed to probe clip: {}", path.display()))?;

        let mut clip = Clip::new(data, content_type);
        if let Some(duration) = duration {
            if duration > request.max_duration {
                anyhow::bail!(
                    "Clip for {} is {:.1}s, longer than the {}s limit",
                    request.question_id,
                    duration.as_secs_f64(),
                    request.max_duration.as_secs()
                );
            }
            clip = clip.with_duration(duration);
        }

        info!(
            "Loaded clip for {} from {} ({} bytes)",
            request.question_id,
            path.display(),
            clip.len()
        );

        Ok(CaptureOutcome::Clip(clip))
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Duration of an encoded clip
///
/// WAV is read from its header; other containers go through the symphonia
/// probe. Returns `None` when the container does not declare a length.
pub fn probe_duration(data: &[u8], path: &Path) -> Result<Option<Duration>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if extension == "wav" {
        let reader = hound::WavReader::new(Cursor::new(data)).context("Failed to open WAV clip")?;
        let spec = reader.spec();
        let frames = reader.duration() as u64;
        return Ok(Some(Duration::from_millis(
            frames * 1000 / spec.sample_rate.max(1) as u64,
        )));
    }

    let mut hint = Hint::new();
    if !extension.is_empty() {
        hint.with_extension(&extension);
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unsupported clip format")?;

    let duration = probed.format.default_track().and_then(|track| {
        let params = &track.codec_params;
        let frames = params.n_frames?;
        match (params.time_base, params.sample_rate) {
            (Some(tb), _) => {
                let time = tb.calc_time(frames);
                Some(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac))
            }
            (None, Some(rate)) => Some(Duration::from_millis(frames * 1000 / rate.max(1) as u64)),
            (None, None) => None,
        }
    });

    debug!("Probed {} clip: {:?}", extension, duration);

    Ok(duration)
}

// Tests for the recorder implementations
//
// FrameRecorder is fed by an in-memory audio backend; FileRecorder reads
// WAV clips written to a temporary directory.

use anyhow::Result;
use interview_wizard::recorder::{
    probe_duration, AudioBackend, AudioFrame, CaptureOutcome, CaptureRequest, FileRecorder,
    FrameRecorder, Recorder, WAV_CONTENT_TYPE,
};
use interview_wizard::wizard::Question;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Backend that replays a fixed list of frames per capture
struct ReplayBackend {
    frames: Vec<AudioFrame>,
    fail_start: bool,
    capturing: Arc<AtomicBool>,
}

impl ReplayBackend {
    fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            fail_start: false,
            capturing: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for ReplayBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.fail_start {
            anyhow::bail!("Microphone unavailable");
        }

        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in &self.frames {
            tx.send(frame.clone()).await?;
        }
        self.capturing.store(true, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// `count` frames of 100ms at 16kHz mono
fn frames(count: u64) -> Vec<AudioFrame> {
    (0..count)
        .map(|i| AudioFrame {
            samples: vec![(i % 100) as i16; 1600],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: i * 100,
        })
        .collect()
}

fn request(id: &str, max_secs: u64) -> CaptureRequest {
    CaptureRequest::for_question(&Question::new(id, "Tell us about yourself", max_secs), 1, 2)
}

fn wav_bytes(seconds: u32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..seconds * sample_rate {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn read_wav(data: &[u8]) -> (hound::WavSpec, usize) {
    let reader = hound::WavReader::new(Cursor::new(data)).unwrap();
    let spec = reader.spec();
    (spec, reader.len() as usize)
}

#[test]
fn test_capture_request_attempts_remaining() {
    let question = Question::new("q1", "Prompt", 30);

    let first = CaptureRequest::for_question(&question, 1, 2);
    assert_eq!(first.max_duration, Duration::from_secs(30));
    assert_eq!(first.attempts_remaining(), 2);

    let last = CaptureRequest::for_question(&question, 3, 2);
    assert_eq!(last.attempts_remaining(), 0);
}

#[tokio::test]
async fn test_frame_recorder_encodes_wav_clip() -> Result<()> {
    let backend = ReplayBackend::new(frames(20));
    let capturing = backend.capturing.clone();
    let mut recorder = FrameRecorder::new(Box::new(backend));

    let outcome = recorder.capture(&request("q1", 60)).await?;

    let CaptureOutcome::Clip(clip) = outcome else {
        panic!("expected a clip");
    };
    assert_eq!(clip.content_type, WAV_CONTENT_TYPE);
    assert_eq!(clip.duration_ms, Some(2000));

    let (spec, samples) = read_wav(&clip.data);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert_eq!(samples, 20 * 1600);

    assert!(!capturing.load(Ordering::SeqCst), "backend should be stopped");

    Ok(())
}

#[tokio::test]
async fn test_frame_recorder_cuts_at_max_duration() -> Result<()> {
    // 5 seconds of audio against a 2 second limit
    let mut recorder = FrameRecorder::new(Box::new(ReplayBackend::new(frames(50))));

    let outcome = recorder.capture(&request("q1", 2)).await?;

    let CaptureOutcome::Clip(clip) = outcome else {
        panic!("expected a clip");
    };
    assert_eq!(clip.duration_ms, Some(2000));
    assert_eq!(read_wav(&clip.data).1, 2 * 16000);

    Ok(())
}

#[tokio::test]
async fn test_frame_recorder_stops_at_timestamp_limit() -> Result<()> {
    // A stalled device: frames arrive with a gap that spans the whole limit
    let mut input = frames(4);
    input[2].timestamp_ms = 2500;
    input[3].timestamp_ms = 2600;
    let backend = ReplayBackend::new(input);
    let capturing = backend.capturing.clone();
    let mut recorder = FrameRecorder::new(Box::new(backend));

    let outcome = recorder.capture(&request("q1", 2)).await?;

    let CaptureOutcome::Clip(clip) = outcome else {
        panic!("expected a clip");
    };
    assert_eq!(read_wav(&clip.data).1, 2 * 1600);
    assert_eq!(clip.duration_ms, Some(200));
    assert!(!capturing.load(Ordering::SeqCst), "backend should be stopped");

    Ok(())
}

#[tokio::test]
async fn test_frame_recorder_skips_mismatched_frames() -> Result<()> {
    let mut input = frames(10);
    input[3].sample_rate = 48000;
    let mut recorder = FrameRecorder::new(Box::new(ReplayBackend::new(input)));

    let outcome = recorder.capture(&request("q1", 60)).await?;

    let CaptureOutcome::Clip(clip) = outcome else {
        panic!("expected a clip");
    };
    assert_eq!(read_wav(&clip.data).1, 9 * 1600);

    Ok(())
}

#[tokio::test]
async fn test_frame_recorder_without_frames_yields_no_clip() -> Result<()> {
    let mut recorder = FrameRecorder::new(Box::new(ReplayBackend::new(Vec::new())));

    let outcome = recorder.capture(&request("q1", 60)).await?;

    assert_eq!(outcome, CaptureOutcome::NoClip);

    Ok(())
}

#[tokio::test]
async fn test_frame_recorder_reports_device_failure() {
    let mut backend = ReplayBackend::new(frames(5));
    backend.fail_start = true;
    let mut recorder = FrameRecorder::new(Box::new(backend));

    let err = recorder.capture(&request("q1", 60)).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Microphone unavailable"));
}

#[tokio::test]
async fn test_file_recorder_loads_clip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("q1.wav"), wav_bytes(3, 8000))?;

    let mut recorder = FileRecorder::new(temp_dir.path());
    let outcome = recorder.capture(&request("q1", 10)).await?;

    let CaptureOutcome::Clip(clip) = outcome else {
        panic!("expected a clip");
    };
    assert_eq!(clip.content_type, "audio/wav");
    assert_eq!(clip.duration_ms, Some(3000));
    assert_eq!(recorder.name(), "file");

    Ok(())
}

#[tokio::test]
async fn test_file_recorder_missing_clip_is_no_clip() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let mut recorder = FileRecorder::new(temp_dir.path());
    let outcome = recorder.capture(&request("q2", 10)).await?;

    assert_eq!(outcome, CaptureOutcome::NoClip);

    Ok(())
}

#[tokio::test]
async fn test_file_recorder_rejects_long_clip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("q1.wav"), wav_bytes(5, 8000))?;

    let mut recorder = FileRecorder::new(temp_dir.path());
    let err = recorder.capture(&request("q1", 2)).await.unwrap_err();

    assert!(err.to_string().contains("longer than"));

    Ok(())
}

#[test]
fn test_probe_duration_wav() -> Result<()> {
    let duration = probe_duration(&wav_bytes(2, 16000), Path::new("answer.wav"))?;
    assert_eq!(duration, Some(Duration::from_secs(2)));
    Ok(())
}

#[test]
fn test_probe_duration_rejects_garbage() {
    let result = probe_duration(b"definitely not media", Path::new("answer.webm"));
    assert!(result.is_err());
}

//! Recorder collaborator
//!
//! Produces one clip per question, bounded by the question's maximum
//! duration:
//! - `FrameRecorder`: PCM frames from an `AudioBackend`, encoded as WAV
//! - `FileRecorder`: pre-recorded clip files, one per question id

pub mod backend;
pub mod file;
pub mod frames;

pub use backend::{AudioBackend, AudioFrame, CaptureOutcome, CaptureRequest, Recorder};
pub use file::{probe_duration, FileRecorder};
pub use frames::{FrameRecorder, WAV_CONTENT_TYPE};

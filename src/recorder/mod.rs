//! Capture and recognition control
//!
//! This module implements the record/recognize state machine:
//! - RecordingSession holding mode, capture state and the frame buffer
//! - SignRecorder routing flushed captures to the matcher or to storage

pub mod coordinator;
pub mod state;

pub use coordinator::{RecorderEvent, SignRecorder};
pub use state::{CaptureState, FlushOutcome, FrameOutcome, Mode, RecordingSession};

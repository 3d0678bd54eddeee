//! Capture state management
//!
//! Defines the capture state machine, the record/recognize mode and the
//! per-session buffer.

use crate::landmarks::HandFrame;
use crate::matcher::{Recognition, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a flushed capture window is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Store the capture as a new reference under the active label
    Record,
    /// Match the capture against the reference library
    Recognize,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Record => Mode::Recognize,
            Mode::Recognize => Mode::Record,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Recognize
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Record => f.write_str("record"),
            Mode::Recognize => f.write_str("recognize"),
        }
    }
}

/// Current state of the capture window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    /// No capture in progress
    Idle,
    /// Frames are being buffered
    Recording,
    /// The buffer is being handed to the matcher or to storage.
    ///
    /// Only held inside a single `&mut` call on the recorder, so callers
    /// never observe it; exclusive borrowing is what keeps a begin or a
    /// frame from interleaving with a flush.
    Flushing,
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Transient state of one recognizer session
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    pub mode: Mode,
    pub state: CaptureState,

    /// Sign name being recorded, only ever set in record mode
    pub active_label: Option<String>,

    buffer: Vec<HandFrame>,
}

impl RecordingSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Open a capture window with an empty buffer
    pub fn start(&mut self) {
        self.buffer.clear();
        self.state = CaptureState::Recording;
    }

    pub fn push(&mut self, frame: HandFrame) {
        self.buffer.push(frame);
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Move the buffered frames out, leaving the buffer empty
    pub fn take_buffer(&mut self) -> Vec<HandFrame> {
        std::mem::take(&mut self.buffer)
    }

    /// Drop the buffer and return to idle. Returns the number of frames dropped.
    pub fn discard(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        self.state = CaptureState::Idle;
        dropped
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Recording
    }
}

/// What a flush produced
#[derive(Debug, Clone, PartialEq)]
pub enum FlushOutcome {
    /// Recognize mode: the capture was classified
    Recognized(Recognition),
    /// Record mode: the capture was stored under `label`
    Saved { label: String, frames: usize },
}

/// Result of processing one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Verdict produced by this frame, if it triggered a classification
    pub verdict: Option<Verdict>,

    /// Whether a capture window is open after this frame
    pub is_capturing: bool,

    /// Raw DTW distance behind `verdict`
    pub distance: Option<f64>,

    /// Label stored by an automatic flush in record mode
    pub saved: Option<String>,
}

impl FrameOutcome {
    pub(crate) fn capturing(is_capturing: bool) -> Self {
        Self {
            is_capturing,
            ..Default::default()
        }
    }

    pub(crate) fn from_recognition(recognition: Recognition, is_capturing: bool) -> Self {
        Self {
            verdict: Some(recognition.verdict),
            is_capturing,
            distance: recognition.distance,
            saved: None,
        }
    }

    pub(crate) fn from_flush(outcome: FlushOutcome, is_capturing: bool) -> Self {
        match outcome {
            FlushOutcome::Recognized(recognition) => Self::from_recognition(recognition, is_capturing),
            FlushOutcome::Saved { label, .. } => Self {
                saved: Some(label),
                is_capturing,
                ..Default::default()
            },
        }
    }
}

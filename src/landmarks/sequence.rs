//! Ordered hand-frame sequences

use super::frame::HandFrame;
use crate::utils::{AppError, AppResult};

/// A recorded gesture: one or more hand frames in capture order
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    frames: Vec<HandFrame>,
}

impl Sequence {
    /// Create a sequence, rejecting an empty frame list
    pub fn new(frames: Vec<HandFrame>) -> AppResult<Self> {
        if frames.is_empty() {
            return Err(AppError::EmptySequence);
        }
        Ok(Self { frames })
    }

    /// A one-frame sequence
    pub fn single(frame: HandFrame) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    pub fn frames(&self) -> &[HandFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<HandFrame> {
        self.frames
    }
}

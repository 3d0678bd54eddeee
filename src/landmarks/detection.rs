//! Extractor output
//!
//! The pose extractor reports each body part as either a list of landmarks
//! or nothing at all. Absence is explicit here and only turns into the
//! all-zero sentinel when flattened into a `LandmarkFrame`.

use serde::{Deserialize, Serialize};

/// A single 3D hand landmark (normalized image coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A body pose landmark, which also carries a visibility score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

/// Holistic detection result for one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticDetection {
    /// Body pose landmarks, `None` when no body was detected
    pub pose: Option<Vec<PoseLandmark>>,

    /// Left hand landmarks, `None` when the left hand is not visible
    pub left_hand: Option<Vec<Landmark>>,

    /// Right hand landmarks, `None` when the right hand is not visible
    pub right_hand: Option<Vec<Landmark>>,
}

impl HolisticDetection {
    /// Whether either hand was detected
    pub fn has_hands(&self) -> bool {
        self.left_hand.is_some() || self.right_hand.is_some()
    }
}

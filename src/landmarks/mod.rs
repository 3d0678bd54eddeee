//! Landmark data model
//!
//! Per-frame landmark vectors produced from the external pose extractor:
//! - `HolisticDetection`: tagged extractor output, each body part present or absent
//! - `LandmarkFrame`: fixed-length pose and hand vectors for one camera frame
//! - `HandFrame` / `Sequence`: the hand-only form used for matching and storage

mod detection;
mod frame;
mod sequence;

pub use detection::{HolisticDetection, Landmark, PoseLandmark};
pub use frame::{HandFrame, LandmarkFrame};
pub use sequence::Sequence;

/// Landmarks reported per hand (wrist plus four joints on each finger)
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmarks reported for the body pose
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Flattened hand vector length: x, y, z per joint
pub const HAND_VECTOR_LEN: usize = HAND_LANDMARK_COUNT * 3;

/// Flattened pose vector length: x, y, z, visibility per landmark
pub const POSE_VECTOR_LEN: usize = POSE_LANDMARK_COUNT * 4;

/// Length of the per-frame feature vector used by the matcher (left ‖ right)
pub const FEATURE_VECTOR_LEN: usize = HAND_VECTOR_LEN * 2;

//! Fixed-length landmark vectors
//!
//! Every frame has the same shape. A body part that was not detected is
//! stored as the all-zero vector of its length, so any two frames can be
//! compared element by element.

use super::detection::HolisticDetection;
use super::{HAND_LANDMARK_COUNT, HAND_VECTOR_LEN, POSE_LANDMARK_COUNT, POSE_VECTOR_LEN};
use crate::utils::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Landmark vectors captured from one camera frame
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    pose: Vec<f64>,
    hands: HandFrame,
}

impl LandmarkFrame {
    /// Build a frame from already flattened vectors
    pub fn new(pose: Vec<f64>, left_hand: Vec<f64>, right_hand: Vec<f64>) -> AppResult<Self> {
        check_vector("pose", &pose, POSE_VECTOR_LEN)?;
        Ok(Self {
            pose,
            hands: HandFrame::new(left_hand, right_hand)?,
        })
    }

    /// A frame where nothing was detected
    pub fn absent() -> Self {
        Self {
            pose: vec![0.0; POSE_VECTOR_LEN],
            hands: HandFrame::absent(),
        }
    }

    /// Flatten an extractor result, substituting zeros for missing parts
    pub fn from_detection(detection: &HolisticDetection) -> AppResult<Self> {
        let pose = match &detection.pose {
            Some(landmarks) => {
                if landmarks.len() != POSE_LANDMARK_COUNT {
                    return Err(AppError::InvalidFrame(format!(
                        "pose has {} landmarks (expected {})",
                        landmarks.len(),
                        POSE_LANDMARK_COUNT
                    )));
                }
                landmarks
                    .iter()
                    .flat_map(|l| [l.x, l.y, l.z, l.visibility])
                    .collect()
            }
            None => vec![0.0; POSE_VECTOR_LEN],
        };

        let left_hand = flatten_hand("left hand", detection.left_hand.as_deref())?;
        let right_hand = flatten_hand("right hand", detection.right_hand.as_deref())?;

        Self::new(pose, left_hand, right_hand)
    }

    /// Pose vector (display only, never matched)
    pub fn pose(&self) -> &[f64] {
        &self.pose
    }

    pub fn left_hand(&self) -> &[f64] {
        self.hands.left_hand()
    }

    pub fn right_hand(&self) -> &[f64] {
        self.hands.right_hand()
    }

    pub fn has_pose(&self) -> bool {
        !is_absent(&self.pose)
    }

    /// The hand part of this frame, which is all matching and storage retain
    pub fn hands(&self) -> &HandFrame {
        &self.hands
    }

    pub fn into_hands(self) -> HandFrame {
        self.hands
    }
}

/// Left and right hand vectors of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandFrame {
    left_hand: Vec<f64>,
    right_hand: Vec<f64>,
}

impl HandFrame {
    pub fn new(left_hand: Vec<f64>, right_hand: Vec<f64>) -> AppResult<Self> {
        let frame = Self {
            left_hand,
            right_hand,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Both hands absent
    pub fn absent() -> Self {
        Self {
            left_hand: vec![0.0; HAND_VECTOR_LEN],
            right_hand: vec![0.0; HAND_VECTOR_LEN],
        }
    }

    pub fn left_hand(&self) -> &[f64] {
        &self.left_hand
    }

    pub fn right_hand(&self) -> &[f64] {
        &self.right_hand
    }

    pub fn has_left_hand(&self) -> bool {
        !is_absent(&self.left_hand)
    }

    pub fn has_right_hand(&self) -> bool {
        !is_absent(&self.right_hand)
    }

    /// Feature vector: left hand followed by right hand
    pub fn features(&self) -> impl Iterator<Item = f64> + '_ {
        self.left_hand.iter().chain(self.right_hand.iter()).copied()
    }

    /// Euclidean distance between the feature vectors of two frames
    pub fn distance(&self, other: &HandFrame) -> f64 {
        self.features()
            .zip(other.features())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Check vector lengths and coordinates.
    ///
    /// Deserialized frames skip the constructor, so storage calls this
    /// before trusting a loaded record.
    pub fn validate(&self) -> AppResult<()> {
        check_vector("left hand", &self.left_hand, HAND_VECTOR_LEN)?;
        check_vector("right hand", &self.right_hand, HAND_VECTOR_LEN)
    }
}

fn flatten_hand(
    part: &str,
    landmarks: Option<&[super::detection::Landmark]>,
) -> AppResult<Vec<f64>> {
    match landmarks {
        Some(landmarks) => {
            if landmarks.len() != HAND_LANDMARK_COUNT {
                return Err(AppError::InvalidFrame(format!(
                    "{} has {} landmarks (expected {})",
                    part,
                    landmarks.len(),
                    HAND_LANDMARK_COUNT
                )));
            }
            Ok(landmarks.iter().flat_map(|l| [l.x, l.y, l.z]).collect())
        }
        None => Ok(vec![0.0; HAND_VECTOR_LEN]),
    }
}

fn check_vector(part: &str, values: &[f64], expected_len: usize) -> AppResult<()> {
    if values.len() != expected_len {
        return Err(AppError::InvalidFrame(format!(
            "{} vector has length {} (expected {})",
            part,
            values.len(),
            expected_len
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InvalidFrame(format!(
            "{} vector contains a non-finite coordinate",
            part
        )));
    }
    Ok(())
}

fn is_absent(values: &[f64]) -> bool {
    values.iter().all(|&v| v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, PoseLandmark, FEATURE_VECTOR_LEN};

    fn hand(offset: f64) -> Vec<Landmark> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| Landmark::new(offset + i as f64 * 0.01, 0.5, -0.1))
            .collect()
    }

    #[test]
    fn test_absent_parts_become_zero_vectors() {
        let detection = HolisticDetection {
            pose: None,
            left_hand: None,
            right_hand: Some(hand(0.2)),
        };

        let frame = LandmarkFrame::from_detection(&detection).unwrap();

        assert_eq!(frame.pose().len(), POSE_VECTOR_LEN);
        assert_eq!(frame.left_hand().len(), HAND_VECTOR_LEN);
        assert!(frame.left_hand().iter().all(|&v| v == 0.0));
        assert!(!frame.has_pose());
        assert!(!frame.hands().has_left_hand());
        assert!(frame.hands().has_right_hand());
        assert_eq!(frame.right_hand()[0], 0.2);
        assert_eq!(frame.right_hand()[2], -0.1);
    }

    #[test]
    fn test_pose_flattening_includes_visibility() {
        let pose = vec![
            PoseLandmark {
                x: 0.1,
                y: 0.2,
                z: 0.3,
                visibility: 0.9,
            };
            POSE_LANDMARK_COUNT
        ];
        let detection = HolisticDetection {
            pose: Some(pose),
            ..Default::default()
        };

        let frame = LandmarkFrame::from_detection(&detection).unwrap();

        assert!(frame.has_pose());
        assert_eq!(&frame.pose()[..4], &[0.1, 0.2, 0.3, 0.9]);
    }

    #[test]
    fn test_wrong_landmark_count_is_rejected() {
        let detection = HolisticDetection {
            left_hand: Some(vec![Landmark::default(); 5]),
            ..Default::default()
        };

        let err = LandmarkFrame::from_detection(&detection).unwrap_err();
        assert!(matches!(err, AppError::InvalidFrame(_)));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut left = vec![0.0; HAND_VECTOR_LEN];
        left[3] = f64::NAN;

        assert!(HandFrame::new(left, vec![0.0; HAND_VECTOR_LEN]).is_err());
        assert!(HandFrame::new(vec![0.0; 10], vec![0.0; HAND_VECTOR_LEN]).is_err());
    }

    #[test]
    fn test_features_concatenate_left_then_right() {
        let frame = HandFrame::new(vec![1.0; HAND_VECTOR_LEN], vec![2.0; HAND_VECTOR_LEN]).unwrap();
        let features: Vec<f64> = frame.features().collect();

        assert_eq!(features.len(), FEATURE_VECTOR_LEN);
        assert_eq!(features[0], 1.0);
        assert_eq!(features[HAND_VECTOR_LEN], 2.0);
    }

    #[test]
    fn test_distance_is_euclidean() {
        let a = HandFrame::absent();
        let mut left = vec![0.0; HAND_VECTOR_LEN];
        left[0] = 3.0;
        let mut right = vec![0.0; HAND_VECTOR_LEN];
        right[0] = 4.0;
        let b = HandFrame::new(left, right).unwrap();

        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }
}

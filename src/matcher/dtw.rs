//! Dynamic time warping kernel
//!
//! Full-matrix DTW with Euclidean local cost and the standard
//! (match, insertion, deletion) step pattern. The path is anchored at the
//! first and last frames of both sequences. No window and no step weights.

use crate::landmarks::HandFrame;

/// Cumulative cost of the optimal warping path between two frame sequences.
///
/// Returns `f64::INFINITY` if either side is empty; `Sequence` never is.
pub fn dtw_distance(query: &[HandFrame], reference: &[HandFrame]) -> f64 {
    if query.is_empty() || reference.is_empty() {
        return f64::INFINITY;
    }

    // Two rolling rows of the (query + 1) x (reference + 1) cost matrix.
    // Column 0 is the boundary, only the origin cell is reachable.
    let width = reference.len() + 1;
    let mut prev = vec![f64::INFINITY; width];
    let mut curr = vec![f64::INFINITY; width];
    prev[0] = 0.0;

    for q in query {
        curr[0] = f64::INFINITY;
        for (j, r) in reference.iter().enumerate() {
            let best = prev[j].min(prev[j + 1]).min(curr[j]);
            curr[j + 1] = q.distance(r) + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[width - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HAND_VECTOR_LEN;

    /// Frame whose left hand is filled with `value` and right hand absent
    fn frame(value: f64) -> HandFrame {
        HandFrame::new(vec![value; HAND_VECTOR_LEN], vec![0.0; HAND_VECTOR_LEN]).unwrap()
    }

    fn frames(values: &[f64]) -> Vec<HandFrame> {
        values.iter().map(|&v| frame(v)).collect()
    }

    /// Distance between frame(a) and frame(b)
    fn unit(a: f64, b: f64) -> f64 {
        ((a - b).powi(2) * HAND_VECTOR_LEN as f64).sqrt()
    }

    #[test]
    fn test_identical_sequences_have_zero_distance() {
        let a = frames(&[0.1, 0.4, 0.9, 0.3]);
        assert_eq!(dtw_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = frames(&[0.1, 0.4, 0.9, 0.3, 0.2]);
        let b = frames(&[0.0, 0.5, 0.5, 0.8]);
        assert_eq!(dtw_distance(&a, &b), dtw_distance(&b, &a));
        assert!(dtw_distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_duplicated_frames_are_absorbed() {
        let reference = frames(&[0.1, 0.4, 0.9]);
        let stretched = frames(&[0.1, 0.1, 0.4, 0.9, 0.9, 0.9]);
        assert_eq!(dtw_distance(&stretched, &reference), 0.0);
        assert_eq!(dtw_distance(&reference, &stretched), 0.0);
    }

    #[test]
    fn test_single_frame_query_aligns_to_every_reference_frame() {
        // A one-frame query must be matched against all reference frames
        let query = frames(&[0.5]);
        let reference = frames(&[0.5, 0.6, 0.7]);
        let expected = unit(0.5, 0.6) + unit(0.5, 0.7);
        assert!((dtw_distance(&query, &reference) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_known_alignment_cost() {
        // Optimal path: (0,0) (1,1) (2,1) (3,2)
        let a = frames(&[0.0, 1.0, 1.0, 2.0]);
        let b = frames(&[0.0, 1.0, 3.0]);
        let expected = unit(2.0, 3.0);
        assert!((dtw_distance(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_endpoints_are_anchored() {
        // Mismatched last frames cannot be skipped
        let a = frames(&[0.2, 0.3, 0.4]);
        let b = frames(&[0.2, 0.3, 0.4, 0.8]);
        let expected = unit(0.4, 0.8);
        assert!((dtw_distance(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_absent_hands_are_ordinary_points() {
        let empty = vec![HandFrame::absent(); 3];
        assert_eq!(dtw_distance(&empty, &empty), 0.0);
        assert!(dtw_distance(&empty, &frames(&[0.5])) > 0.0);
    }

    #[test]
    fn test_empty_input_is_infinite() {
        assert!(dtw_distance(&[], &frames(&[0.1])).is_infinite());
        assert!(dtw_distance(&frames(&[0.1]), &[]).is_infinite());
    }
}

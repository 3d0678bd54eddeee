//! Sequence matching
//!
//! Scores a query sequence against every reference in the library with DTW,
//! reduces the scores to one per label (best reference wins) and turns the
//! overall best into a verdict using an acceptance threshold.

mod dtw;

pub use dtw::dtw_distance;

use crate::landmarks::Sequence;
use crate::library::ReferenceLibrary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display text for a rejected match
pub const UNRECOGNIZED_TEXT: &str = "Unknown Sign";

/// Display text when there is nothing to compare against
pub const NO_REFERENCES_TEXT: &str = "No reference signs";

/// Outcome of classifying one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "camelCase")]
pub enum Verdict {
    /// The query matched this label within the threshold
    Sign(String),
    /// The closest label was too far away
    Unrecognized,
    /// The library is empty
    NoReferences,
}

impl Verdict {
    /// The matched label, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Verdict::Sign(label) => Some(label),
            Verdict::Unrecognized | Verdict::NoReferences => None,
        }
    }

    pub fn is_sign(&self) -> bool {
        matches!(self, Verdict::Sign(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sign(label) => f.write_str(label),
            Verdict::Unrecognized => f.write_str(UNRECOGNIZED_TEXT),
            Verdict::NoReferences => f.write_str(NO_REFERENCES_TEXT),
        }
    }
}

/// A verdict plus the raw best distance behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recognition {
    pub verdict: Verdict,

    /// Smallest label distance, reported whether or not it was accepted.
    /// `None` only when there was nothing finite to compare against.
    pub distance: Option<f64>,
}

/// Best distance for one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub distance: f64,
}

/// DTW nearest-label classifier
#[derive(Debug, Clone)]
pub struct DtwMatcher {
    acceptance_threshold: f64,
}

impl DtwMatcher {
    /// Create a matcher that accepts labels at or below `acceptance_threshold`
    pub fn new(acceptance_threshold: f64) -> Self {
        Self {
            acceptance_threshold,
        }
    }

    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }

    /// Per-label distance to `query`, in label order.
    ///
    /// Labels whose references all yield a non-finite distance are left out.
    pub fn score_labels(&self, query: &Sequence, library: &ReferenceLibrary) -> Vec<LabelScore> {
        let mut scores = Vec::with_capacity(library.len());

        for (label, references) in library.iter() {
            let mut best = f64::INFINITY;
            for (i, reference) in references.iter().enumerate() {
                let distance = dtw_distance(query.frames(), reference.frames());
                if !distance.is_finite() {
                    tracing::error!(
                        "Non-finite DTW distance for '{}' reference {}: {}",
                        label,
                        i,
                        distance
                    );
                    continue;
                }
                best = best.min(distance);
            }

            if best.is_finite() {
                scores.push(LabelScore {
                    label: label.to_string(),
                    distance: best,
                });
            }
        }

        scores
    }

    /// Classify `query` against the library
    pub fn classify(&self, query: &Sequence, library: &ReferenceLibrary) -> Recognition {
        if library.is_empty() {
            return Recognition {
                verdict: Verdict::NoReferences,
                distance: None,
            };
        }

        // Strictly-less keeps the first label in iteration order on ties
        let mut best: Option<LabelScore> = None;
        for score in self.score_labels(query, library) {
            let improves = best
                .as_ref()
                .map_or(true, |current| score.distance < current.distance);
            if improves {
                best = Some(score);
            }
        }

        let Some(best) = best else {
            return Recognition {
                verdict: Verdict::Unrecognized,
                distance: None,
            };
        };

        tracing::debug!(
            "Best match '{}' at distance {:.4} (threshold {:.4}, query {} frames)",
            best.label,
            best.distance,
            self.acceptance_threshold,
            query.len()
        );

        let verdict = if best.distance > self.acceptance_threshold {
            Verdict::Unrecognized
        } else {
            Verdict::Sign(best.label)
        };

        Recognition {
            verdict,
            distance: Some(best.distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HandFrame, HAND_VECTOR_LEN};

    fn frame(left: f64, right: f64) -> HandFrame {
        HandFrame::new(vec![left; HAND_VECTOR_LEN], vec![right; HAND_VECTOR_LEN]).unwrap()
    }

    fn sequence(values: &[(f64, f64)]) -> Sequence {
        Sequence::new(values.iter().map(|&(l, r)| frame(l, r)).collect()).unwrap()
    }

    fn hello() -> Sequence {
        sequence(&[(0.1, 0.0), (0.2, 0.0), (0.3, 0.1), (0.4, 0.2)])
    }

    fn thanks() -> Sequence {
        sequence(&[(0.0, 0.6), (0.0, 0.7), (0.1, 0.8)])
    }

    fn library() -> ReferenceLibrary {
        let mut library = ReferenceLibrary::new();
        library.insert("Hello", hello());
        library.insert("Thanks", thanks());
        library
    }

    #[test]
    fn test_empty_library_yields_no_references() {
        let matcher = DtwMatcher::new(10.0);
        let recognition = matcher.classify(&hello(), &ReferenceLibrary::new());

        assert_eq!(recognition.verdict, Verdict::NoReferences);
        assert_eq!(recognition.distance, None);
        assert_eq!(recognition.verdict.to_string(), NO_REFERENCES_TEXT);
    }

    #[test]
    fn test_exact_reference_matches_with_zero_distance() {
        let matcher = DtwMatcher::new(1.0);
        let recognition = matcher.classify(&thanks(), &library());

        assert_eq!(recognition.verdict, Verdict::Sign("Thanks".to_string()));
        assert_eq!(recognition.distance, Some(0.0));
    }

    #[test]
    fn test_trailing_duplicates_still_match() {
        let mut frames = hello().into_frames();
        let last = frames.last().cloned().unwrap();
        frames.push(last.clone());
        frames.push(last);
        let query = Sequence::new(frames).unwrap();

        let mut library = ReferenceLibrary::new();
        library.insert("Hello", hello());
        let recognition = DtwMatcher::new(1.0).classify(&query, &library);

        assert_eq!(recognition.verdict.label(), Some("Hello"));
        assert!(recognition.distance.unwrap() < 1e-9);
    }

    #[test]
    fn test_distance_above_threshold_is_unrecognized() {
        let query = sequence(&[(0.9, 0.9), (0.95, 0.9)]);
        let recognition = DtwMatcher::new(0.5).classify(&query, &library());

        assert_eq!(recognition.verdict, Verdict::Unrecognized);
        assert_eq!(recognition.verdict.to_string(), UNRECOGNIZED_TEXT);
        // Rejected matches still report how far off they were
        assert!(recognition.distance.unwrap() > 0.5);
    }

    #[test]
    fn test_label_score_is_best_reference() {
        let mut library = ReferenceLibrary::new();
        library.insert("Hello", sequence(&[(0.9, 0.9)]));
        library.insert("Hello", hello());

        let scores = DtwMatcher::new(1.0).score_labels(&hello(), &library);

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].distance, 0.0);
    }

    #[test]
    fn test_ties_resolve_to_first_label() {
        let mut library = ReferenceLibrary::new();
        library.insert("Zebra", hello());
        library.insert("Apple", hello());

        let recognition = DtwMatcher::new(1.0).classify(&hello(), &library);

        assert_eq!(recognition.verdict.label(), Some("Apple"));
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::Sign("Hello".into())).unwrap();
        assert_eq!(json, r#"{"kind":"sign","label":"Hello"}"#);
        let json = serde_json::to_string(&Verdict::Unrecognized).unwrap();
        assert_eq!(json, r#"{"kind":"unrecognized"}"#);
    }
}

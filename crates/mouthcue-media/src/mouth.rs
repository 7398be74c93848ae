//! Mouth openness from the two inner-lip landmarks.
//!
//! The rule is a fixed vertical gap between landmark 13 (upper lip) and
//! landmark 14 (lower lip) in normalized frame units. There is no
//! calibration or per-speaker adaptation, so faces far from the camera
//! read as closed more often than close-up faces.

use mouthcue_models::{LandmarkSet, MouthState, LOWER_LIP_INDEX, UPPER_LIP_INDEX};

use crate::error::{MediaError, MediaResult};

/// Minimum lip gap, in normalized frame height, for a mouth to count as open.
pub const MOUTH_OPEN_THRESHOLD: f64 = 0.02;

/// Classifies a face's mouth as open or closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthEvaluator {
    threshold: f64,
}

impl Default for MouthEvaluator {
    fn default() -> Self {
        Self {
            threshold: MOUTH_OPEN_THRESHOLD,
        }
    }
}

impl MouthEvaluator {
    /// Create an evaluator with a custom open threshold.
    ///
    /// The threshold must be finite and non-negative.
    pub fn new(threshold: f64) -> MediaResult<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(MediaError::invalid_setting(format!(
                "mouth threshold must be a finite non-negative number, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Vertical distance between the lip landmarks, if both are present.
    pub fn lip_gap(landmarks: &LandmarkSet) -> Option<f64> {
        let upper = landmarks.get(UPPER_LIP_INDEX)?;
        let lower = landmarks.get(LOWER_LIP_INDEX)?;
        Some((upper.y - lower.y).abs())
    }

    /// Evaluate the mouth state of one face.
    ///
    /// Absent, empty or truncated landmark sets evaluate as closed with no
    /// anchor. The anchor is always the upper-lip landmark.
    pub fn evaluate(&self, landmarks: Option<&LandmarkSet>) -> MouthState {
        let Some(landmarks) = landmarks else {
            return MouthState::closed();
        };
        let Some(gap) = Self::lip_gap(landmarks) else {
            return MouthState::closed();
        };

        MouthState {
            open: gap > self.threshold,
            anchor: landmarks.get(UPPER_LIP_INDEX).copied(),
        }
    }
}

/// Evaluate with the default threshold.
pub fn evaluate_mouth(landmarks: Option<&LandmarkSet>) -> MouthState {
    MouthEvaluator::default().evaluate(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mouthcue_models::LandmarkPoint;

    /// Face mesh stand-in with only the lip landmarks set meaningfully.
    fn face_with_lips(y13: f64, y14: f64) -> LandmarkSet {
        let mut points = vec![LandmarkPoint::new(0.0, 0.0); 20];
        points[UPPER_LIP_INDEX] = LandmarkPoint::new(0.5, y13);
        points[LOWER_LIP_INDEX] = LandmarkPoint::new(0.5, y14);
        LandmarkSet::new(points)
    }

    #[test]
    fn test_absent_and_empty_are_closed() {
        assert_eq!(evaluate_mouth(None), MouthState::closed());
        assert_eq!(
            evaluate_mouth(Some(&LandmarkSet::default())),
            MouthState::closed()
        );
    }

    #[test]
    fn test_missing_lower_lip_is_closed() {
        // Index 13 present, 14 missing
        let points = vec![LandmarkPoint::new(0.5, 0.1); 14];
        let state = evaluate_mouth(Some(&LandmarkSet::new(points)));
        assert_eq!(state, MouthState::closed());
    }

    #[test]
    fn test_open_when_gap_exceeds_threshold() {
        let state = evaluate_mouth(Some(&face_with_lips(0.40, 0.43)));
        assert!(state.open);
        assert_eq!(state.anchor, Some(LandmarkPoint::new(0.5, 0.40)));
    }

    #[test]
    fn test_closed_when_gap_small() {
        let state = evaluate_mouth(Some(&face_with_lips(0.40, 0.41)));
        assert!(!state.open);
        // Anchor is still reported; only the controller's overlay ignores it.
        assert_eq!(state.anchor, Some(LandmarkPoint::new(0.5, 0.40)));
        assert!(state.overlay_anchor().is_none());
    }

    #[test]
    fn test_threshold_is_strict() {
        let state = evaluate_mouth(Some(&face_with_lips(0.0, MOUTH_OPEN_THRESHOLD)));
        assert!(!state.open, "exactly the threshold is closed");
    }

    #[test]
    fn test_gap_direction_does_not_matter() {
        assert!(evaluate_mouth(Some(&face_with_lips(0.45, 0.40))).open);
    }

    #[test]
    fn test_custom_threshold() {
        let evaluator = MouthEvaluator::new(0.005).unwrap();
        assert!(evaluator.evaluate(Some(&face_with_lips(0.40, 0.41))).open);

        assert!(MouthEvaluator::new(-0.1).is_err());
        assert!(MouthEvaluator::new(f64::NAN).is_err());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let face = face_with_lips(0.3, 0.36);
        assert_eq!(evaluate_mouth(Some(&face)), evaluate_mouth(Some(&face)));
    }
}

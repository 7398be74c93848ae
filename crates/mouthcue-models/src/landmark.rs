//! Normalized facial landmarks as produced by a face-landmark model.
//!
//! # Landmarks Layout
//!
//! The pipeline assumes the 468/478-point face mesh layout, in which
//! index 13 is the bottom edge of the upper lip and index 14 is the top
//! edge of the lower lip. No other index is read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper lip, bottom boundary.
pub const UPPER_LIP_INDEX: usize = 13;

/// Lower lip, top boundary.
pub const LOWER_LIP_INDEX: usize = 14;

/// A landmark normalized to the video frame (0.0 = left/top, 1.0 = right/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    /// Relative depth, when the model reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl LandmarkPoint {
    /// Create a 2D landmark.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Create a landmark with depth.
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// All landmarks for one detected face, addressed by mesh index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, if the model produced that many points.
    pub fn get(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkSet {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}

/// Landmarks detected in a single frame, one set per face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkResult {
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl LandmarkResult {
    pub fn new(faces: Vec<LandmarkSet>) -> Self {
        Self { faces }
    }

    /// The face the overlay follows. Additional faces are ignored.
    pub fn primary_face(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lip_indices_are_adjacent() {
        assert_eq!(UPPER_LIP_INDEX, 13);
        assert_eq!(LOWER_LIP_INDEX, UPPER_LIP_INDEX + 1);
    }

    #[test]
    fn test_landmark_set_deserializes_from_plain_array() {
        let json = r#"[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.05}]"#;
        let set: LandmarkSet = serde_json::from_str(json).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(&LandmarkPoint::new(0.1, 0.2)));
        assert_eq!(set.get(1).and_then(|p| p.z), Some(-0.05));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_primary_face_is_first() {
        let first = LandmarkSet::new(vec![LandmarkPoint::new(0.1, 0.1)]);
        let second = LandmarkSet::new(vec![LandmarkPoint::new(0.9, 0.9)]);
        let result = LandmarkResult::new(vec![first.clone(), second]);

        assert_eq!(result.primary_face(), Some(&first));
        assert!(LandmarkResult::default().primary_face().is_none());
    }

    #[test]
    fn test_result_without_faces_field() {
        let result: LandmarkResult = serde_json::from_str("{}").unwrap();
        assert!(result.is_empty());
    }
}

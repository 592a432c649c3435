//! Landmark source admission rules.
//!
//! Detection confidence filtering and the hand cap belong to the source,
//! not to the classifier; every decoded frame passes through here first.

use tracing::debug;

use super::landmarks::HandPose;

/// Admission settings applied to each frame's detections.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Poses below this confidence (0.0-1.0) are dropped.
    pub min_detection_confidence: f32,
    /// Maximum number of hands kept per frame, in detector order.
    pub max_num_hands: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            max_num_hands: 2,
        }
    }
}

impl SourceConfig {
    /// Filter one frame's detections.
    pub fn admit(&self, poses: Vec<HandPose>) -> Vec<HandPose> {
        let detected = poses.len();
        let admitted: Vec<HandPose> = poses
            .into_iter()
            .filter(|p| p.confidence >= self.min_detection_confidence)
            .take(self.max_num_hands)
            .collect();
        if admitted.len() < detected {
            debug!(
                detected,
                admitted = admitted.len(),
                "source dropped low-confidence or surplus hands"
            );
        }
        admitted
    }

    /// Generate s-expression for protocol config output.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:min-confidence {:.2} :max-hands {})",
            self.min_detection_confidence, self.max_num_hands
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::Handedness;
    use crate::hand::poses::{build_pose, PoseShape};

    fn pose_with_confidence(hand: Handedness, confidence: f32) -> HandPose {
        let mut pose = build_pose(hand, PoseShape::Open);
        pose.confidence = confidence;
        pose
    }

    #[test]
    fn test_drops_low_confidence() {
        let config = SourceConfig::default();
        let admitted = config.admit(vec![
            pose_with_confidence(Handedness::Left, 0.3),
            pose_with_confidence(Handedness::Right, 0.8),
        ]);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].handedness, Handedness::Right);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = SourceConfig::default();
        let admitted = config.admit(vec![pose_with_confidence(Handedness::Left, 0.5)]);
        assert_eq!(admitted.len(), 1);
    }

    #[test]
    fn test_caps_hand_count_in_order() {
        let config = SourceConfig {
            max_num_hands: 1,
            ..SourceConfig::default()
        };
        let admitted = config.admit(vec![
            pose_with_confidence(Handedness::Right, 0.9),
            pose_with_confidence(Handedness::Left, 0.95),
        ]);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].handedness, Handedness::Right);
    }

    #[test]
    fn test_empty_frame() {
        assert!(SourceConfig::default().admit(Vec::new()).is_empty());
    }

    #[test]
    fn test_config_sexp() {
        let sexp = SourceConfig::default().config_sexp();
        assert_eq!(sexp, "(:min-confidence 0.50 :max-hands 2)");
    }
}

//! Template hand poses for the synthetic source and tests.

use super::landmarks::{HandLandmark, HandPose, Handedness, Landmark, LANDMARK_COUNT};

/// Canned shapes the synthetic source can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseShape {
    Fist,
    ThumbsUp,
    Open,
    /// A 20-point pose, rejected by the classifier.
    Malformed,
}

impl PoseShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::ThumbsUp => "thumbs-up",
            Self::Open => "open",
            Self::Malformed => "malformed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fist" => Some(Self::Fist),
            "thumbs-up" | "thumbsup" => Some(Self::ThumbsUp),
            "open" => Some(Self::Open),
            "malformed" => Some(Self::Malformed),
            _ => None,
        }
    }
}

const WRIST: (f32, f32) = (0.5, 0.8);
const FINGER_JOINT_Y: f32 = 0.55;
const THUMB_JOINT_Y: f32 = 0.6;
/// Curled tips sit this far below their joint.
const CURL_DROP: f32 = 0.02;
/// Extended tips sit this far above their joint.
const EXTEND_RISE: f32 = 0.12;

/// Build a 21-point pose (20 for `Malformed`) with the requested shape.
pub fn build_pose(handedness: Handedness, shape: PoseShape) -> HandPose {
    let mut landmarks = vec![Landmark::new(WRIST.0, WRIST.1); LANDMARK_COUNT];

    let (thumb_extended, fingers_extended) = match shape {
        PoseShape::Fist | PoseShape::Malformed => (false, false),
        PoseShape::ThumbsUp => (true, false),
        PoseShape::Open => (true, true),
    };

    for (finger, (tip, joint)) in HandLandmark::finger_pairs().iter().enumerate() {
        let x = 0.35 + finger as f32 * 0.06;
        let (joint_y, extended) = if finger == 0 {
            (THUMB_JOINT_Y, thumb_extended)
        } else {
            (FINGER_JOINT_Y, fingers_extended)
        };
        let tip_y = if extended {
            joint_y - EXTEND_RISE
        } else {
            joint_y + CURL_DROP
        };
        landmarks[joint.index()] = Landmark::new(x, joint_y);
        landmarks[tip.index()] = Landmark::new(x, tip_y);
    }

    if shape == PoseShape::Malformed {
        landmarks.pop();
    }

    HandPose::new(handedness, landmarks, 0.9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_sizes() {
        assert_eq!(build_pose(Handedness::Left, PoseShape::Fist).landmarks.len(), 21);
        assert_eq!(build_pose(Handedness::Left, PoseShape::Malformed).landmarks.len(), 20);
    }

    #[test]
    fn test_thumbs_up_template_geometry() {
        let pose = build_pose(Handedness::Right, PoseShape::ThumbsUp);
        let tip = pose.landmarks[HandLandmark::ThumbTip.index()];
        let joint = pose.landmarks[HandLandmark::ThumbIp.index()];
        assert!(tip.y < joint.y, "thumb tip should be above its joint");
        let index_tip = pose.landmarks[HandLandmark::IndexTip.index()];
        let index_pip = pose.landmarks[HandLandmark::IndexPip.index()];
        assert!(index_tip.y > index_pip.y, "index should be curled");
    }

    #[test]
    fn test_shape_parse() {
        assert_eq!(PoseShape::parse("fist"), Some(PoseShape::Fist));
        assert_eq!(PoseShape::parse("thumbsup"), Some(PoseShape::ThumbsUp));
        assert_eq!(PoseShape::parse("thumbs-up"), Some(PoseShape::ThumbsUp));
        assert_eq!(PoseShape::parse("wave"), None);
        assert_eq!(PoseShape::Open.as_str(), "open");
    }
}

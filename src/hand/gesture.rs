//! Per-frame gesture classification from a single hand's landmarks.
//!
//! Uses only the vertical offset between each fingertip and its proximal
//! joint, which keeps the test independent of hand scale and of most
//! in-plane rotation. Extreme wrist rotation defeats it.

use crate::error::PoseError;

use super::landmarks::{HandLandmark, HandPose, LANDMARK_COUNT};

/// Tolerance (normalized units) applied to every tip/joint comparison.
pub const DEFAULT_CURL_MARGIN: f32 = 0.03;

// ── Gesture categories ─────────────────────────────────────

/// Frame-local classification of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureCategory {
    /// All five fingers curled.
    Fist,
    /// Thumb extended upward, other four curled.
    ThumbsUp,
    /// Anything else.
    Unknown,
}

impl GestureCategory {
    /// String representation for protocol output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::ThumbsUp => "thumbs-up",
            Self::Unknown => "unknown",
        }
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Classify one hand pose.
///
/// A finger is curled when its tip is not meaningfully above its joint
/// (`tip.y + margin >= joint.y`). Handedness is carried on the pose but
/// not consulted yet.
pub fn classify(pose: &HandPose, margin: f32) -> Result<GestureCategory, PoseError> {
    if pose.landmarks.len() != LANDMARK_COUNT {
        return Err(PoseError::InvalidPoseShape {
            expected: LANDMARK_COUNT,
            actual: pose.landmarks.len(),
        });
    }

    let pairs = HandLandmark::finger_pairs();

    if pairs
        .iter()
        .all(|&(tip, joint)| is_curled(pose, tip, joint, margin))
    {
        return Ok(GestureCategory::Fist);
    }

    let (thumb_tip, thumb_joint) = pairs[0];
    if is_extended(pose, thumb_tip, thumb_joint, margin)
        && pairs[1..]
            .iter()
            .all(|&(tip, joint)| is_curled(pose, tip, joint, margin))
    {
        return Ok(GestureCategory::ThumbsUp);
    }

    Ok(GestureCategory::Unknown)
}

/// Tip clearly above its joint. Not the negation of `is_curled`: a NaN
/// coordinate is neither curled nor extended.
fn is_extended(pose: &HandPose, tip: HandLandmark, joint: HandLandmark, margin: f32) -> bool {
    let tip_y = pose.landmarks[tip.index()].y;
    let joint_y = pose.landmarks[joint.index()].y;
    tip_y + margin < joint_y
}

/// Tip at or below its joint, within `margin`.
fn is_curled(pose: &HandPose, tip: HandLandmark, joint: HandLandmark, margin: f32) -> bool {
    let tip_y = pose.landmarks[tip.index()].y;
    let joint_y = pose.landmarks[joint.index()].y;
    tip_y + margin >= joint_y
}

// ── Tests ──────────────────────────────────────────────────

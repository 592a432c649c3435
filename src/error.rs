//! Typed errors for pose classification and frame decoding.

use thiserror::Error;

/// Structural problems with a hand pose handed to the classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoseError {
    #[error("invalid pose shape: expected {expected} landmarks, got {actual}")]
    InvalidPoseShape { expected: usize, actual: usize },
}

/// Problems decoding a message from the frame stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("malformed s-expression: {0}")]
    Malformed(String),
    #[error("missing :{0}")]
    MissingField(&'static str),
    #[error("invalid :{field} value: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("unknown handedness: {0}")]
    UnknownHandedness(String),
    #[error("hand {hand}: landmark {landmark} is not a list of 2 or 3 numbers")]
    BadLandmark { hand: usize, landmark: usize },
}

/// Problems parsing a synthetic source script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("empty script")]
    Empty,
    #[error("step {step}: unknown shape {shape:?} (fist, thumbs-up, open, none, malformed)")]
    UnknownShape { step: usize, shape: String },
    #[error("step {step}: unknown hand {label:?} (l or r)")]
    UnknownHand { step: usize, label: String },
    #[error("step {step}: bad repeat count {count:?}")]
    BadRepeat { step: usize, count: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_error_message() {
        let e = PoseError::InvalidPoseShape {
            expected: 21,
            actual: 20,
        };
        assert_eq!(
            e.to_string(),
            "invalid pose shape: expected 21 landmarks, got 20"
        );
    }

    #[test]
    fn test_frame_error_messages() {
        assert_eq!(FrameError::MissingField("handedness").to_string(), "missing :handedness");
        let e = FrameError::BadLandmark {
            hand: 1,
            landmark: 7,
        };
        assert!(e.to_string().contains("landmark 7"));
    }

    #[test]
    fn test_script_error_names_step() {
        let e = ScriptError::UnknownShape {
            step: 2,
            shape: "wave".to_string(),
        };
        assert!(e.to_string().starts_with("step 2: unknown shape \"wave\""));
    }
}

//! Hand landmark data structures.
//!
//! Models the 21-point hand topology produced by common landmark
//! detectors (wrist, then four points per finger from base to tip).
//! Coordinates are normalized to the image, with `y` growing downward.

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for protocol output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Fingertips, thumb first.
    pub fn fingertips() -> [HandLandmark; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }

    /// The joint each fingertip is compared against, in the same order as
    /// [`HandLandmark::fingertips`]. The thumb has no PIP, so its IP joint
    /// stands in.
    pub fn proximal_joints() -> [HandLandmark; 5] {
        [
            Self::ThumbIp,
            Self::IndexPip,
            Self::MiddlePip,
            Self::RingPip,
            Self::PinkyPip,
        ]
    }

    /// (tip, joint) pairs for all five fingers, thumb first.
    pub fn finger_pairs() -> [(HandLandmark, HandLandmark); 5] {
        let tips = Self::fingertips();
        let joints = Self::proximal_joints();
        [
            (tips[0], joints[0]),
            (tips[1], joints[1]),
            (tips[2], joints[2]),
            (tips[3], joints[3]),
            (tips[4], joints[4]),
        ]
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a detector label. Accepts "left"/"right" in any case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("left") {
            Some(Self::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Some(Self::Right)
        } else {
            None
        }
    }
}

// ── Landmark point ─────────────────────────────────────────

/// A single normalized keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; 0.0 when the source only reports 2D points.
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ── Hand pose ──────────────────────────────────────────────

/// One detected hand for one frame.
///
/// The landmark count is not enforced here; the classifier rejects
/// poses that do not carry exactly [`LANDMARK_COUNT`] points.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    pub handedness: Handedness,
    /// Landmarks indexed by [`HandLandmark`].
    pub landmarks: Vec<Landmark>,
    /// Detection confidence (0.0-1.0).
    pub confidence: f32,
}

impl HandPose {
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>, confidence: f32) -> Self {
        Self {
            handedness,
            landmarks,
            confidence,
        }
    }

    /// Look up a landmark, or None if the pose is short.
    pub fn landmark(&self, which: HandLandmark) -> Option<&Landmark> {
        self.landmarks.get(which.index())
    }

    /// Whether the pose has the full 21-point shape.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }
}

// ── Tests ──────────────────────────────────────────────────

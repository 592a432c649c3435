//! Hand gesture pipeline: landmark types, classification, debounce and
//! per-frame orchestration.
//!
//! - `debounce`: consecutive-frame confirmation state machine
//! - `tracker`: per-frame driver over one or more debounce slots
//! - `source`: detection admission (confidence floor, hand cap)
//! - `poses`: template poses for the synthetic source

pub mod debounce;
pub mod gesture;
pub mod landmarks;
pub mod poses;
pub mod source;
pub mod tracker;

pub use debounce::{Debouncer, GestureEvent, DEFAULT_CONFIRM_FRAMES};
pub use gesture::{classify, GestureCategory, DEFAULT_CURL_MARGIN};
pub use landmarks::{HandLandmark, HandPose, Handedness, Landmark, LANDMARK_COUNT};
pub use source::SourceConfig;
pub use tracker::{FrameReport, GestureConfig, GestureTracker, HandReport, Slot, SlotPolicy};

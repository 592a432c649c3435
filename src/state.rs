//! Application state: the single struct the frame drivers own.
//!
//! Everything mutable lives here and is passed as `&mut` into dispatch,
//! so there is no process-wide gesture state.

use std::time::Instant;

use tracing::info;

use crate::frame_timing::FrameTiming;
use crate::hand::{FrameReport, GestureConfig, GestureTracker, HandPose, SourceConfig};

pub struct AppState {
    pub tracker: GestureTracker,
    pub source: SourceConfig,
    pub timing: FrameTiming,
    /// Cleared to stop the driver after the current frame.
    pub running: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GestureConfig::default(), SourceConfig::default())
    }
}

impl AppState {
    pub fn new(gesture: GestureConfig, source: SourceConfig) -> Self {
        info!(
            "gesture tracker ready: margin {:.3}, confirm {} frame(s), {} slots",
            gesture.curl_margin,
            gesture.confirm_frames,
            gesture.slot_policy.as_str()
        );
        Self {
            tracker: GestureTracker::new(gesture),
            source,
            timing: FrameTiming::default(),
            running: true,
        }
    }

    /// Admit, classify and debounce one frame of detections.
    pub fn process_frame(&mut self, detections: Vec<HandPose>, started: Instant) -> FrameReport {
        let hands = self.source.admit(detections);
        let report = self.tracker.process_frame(&hands);
        self.timing.record(started);
        report
    }

    /// Frames processed so far.
    pub fn frames(&self) -> u64 {
        self.tracker.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::poses::{build_pose, PoseShape};
    use crate::hand::{GestureEvent, Handedness};

    #[test]
    fn test_process_frame_applies_admission() {
        let mut state = AppState::default();
        let mut weak = build_pose(Handedness::Right, PoseShape::Fist);
        weak.confidence = 0.1;
        let report = state.process_frame(vec![weak], Instant::now());
        assert!(report.hands.is_empty());
        assert_eq!(state.frames(), 1);
        assert_eq!(state.timing.total_frames, 1);
    }

    #[test]
    fn test_process_frame_confirms() {
        let mut state = AppState::default();
        let mut last = GestureEvent::None;
        for _ in 0..3 {
            let fist = build_pose(Handedness::Left, PoseShape::Fist);
            last = state.process_frame(vec![fist], Instant::now()).event;
        }
        assert_eq!(last, GestureEvent::Distress);
    }
}

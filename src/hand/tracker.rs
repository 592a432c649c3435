//! Per-frame orchestration: classify every detected hand, feed the
//! debounce slots, and report the frame's event.
//!
//! Two slot policies are supported. `Global` keeps a single counter pair
//! shared by every hand, observed in detector order, so two hands are
//! indistinguishable to the debouncer. `PerHand` keeps one counter pair per
//! handedness label and touches each slot exactly once per frame.

use tracing::{debug, info, warn};

use crate::error::PoseError;

use super::debounce::{Debouncer, GestureEvent, DEFAULT_CONFIRM_FRAMES};
use super::gesture::{classify, GestureCategory, DEFAULT_CURL_MARGIN};
use super::landmarks::{HandPose, Handedness};

// ── Slots ──────────────────────────────────────────────────

/// How hands map onto debounce slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// One shared counter pair; the last hand to confirm wins the frame.
    Global,
    /// One counter pair per handedness label.
    PerHand,
}

impl SlotPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerHand => "per-hand",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(Self::Global),
            "per-hand" | "per_hand" => Some(Self::PerHand),
            _ => None,
        }
    }
}

/// Identity of the debounce slot that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Global,
    Hand(Handedness),
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Hand(h) => h.as_str(),
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Tunables for classification and debounce.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Enable gesture tracking. Frames are still counted when disabled.
    pub enabled: bool,
    /// Tip/joint tolerance in normalized coordinates.
    pub curl_margin: f32,
    /// Consecutive frames needed to confirm a gesture (>= 1).
    pub confirm_frames: u32,
    /// Hand-to-slot mapping.
    pub slot_policy: SlotPolicy,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            curl_margin: DEFAULT_CURL_MARGIN,
            confirm_frames: DEFAULT_CONFIRM_FRAMES,
            slot_policy: SlotPolicy::Global,
        }
    }
}

// ── Reports ────────────────────────────────────────────────

/// Debug view of one hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandReport {
    /// Position in the detector's list for this frame.
    pub index: usize,
    pub handedness: Handedness,
    pub confidence: f32,
    pub category: GestureCategory,
    /// Set when the pose was rejected; `category` is then `Unknown`.
    pub error: Option<PoseError>,
}

/// Everything the output layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// 1-based frame sequence number.
    pub frame: u64,
    /// Headline event for the overlay.
    pub event: GestureEvent,
    pub hands: Vec<HandReport>,
    /// Every slot that confirmed this frame, in observation order.
    pub confirmed: Vec<(Slot, GestureEvent)>,
}

// ── Tracker ────────────────────────────────────────────────

/// Owns the debounce slots and runs the per-frame pipeline.
pub struct GestureTracker {
    config: GestureConfig,
    global: Debouncer,
    left: Debouncer,
    right: Debouncer,
    frames: u64,
    distress_count: u64,
    acknowledge_count: u64,
    last_event: GestureEvent,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        let confirm = config.confirm_frames;
        Self {
            config,
            global: Debouncer::new(confirm),
            left: Debouncer::new(confirm),
            right: Debouncer::new(confirm),
            frames: 0,
            distress_count: 0,
            acknowledge_count: 0,
            last_event: GestureEvent::None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration. Changing the confirmation length or the
    /// slot policy discards in-flight runs.
    pub fn set_config(&mut self, config: GestureConfig) {
        let rebuild = config.confirm_frames != self.config.confirm_frames
            || config.slot_policy != self.config.slot_policy;
        self.config = config;
        if rebuild {
            let confirm = self.config.confirm_frames;
            self.global = Debouncer::new(confirm);
            self.left = Debouncer::new(confirm);
            self.right = Debouncer::new(confirm);
            debug!(
                confirm_frames = confirm,
                policy = self.config.slot_policy.as_str(),
                "debounce slots rebuilt"
            );
        }
    }

    /// Frames processed since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Debounce state for a slot.
    pub fn slot(&self, slot: Slot) -> &Debouncer {
        match slot {
            Slot::Global => &self.global,
            Slot::Hand(Handedness::Left) => &self.left,
            Slot::Hand(Handedness::Right) => &self.right,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Debouncer {
        match slot {
            Slot::Global => &mut self.global,
            Slot::Hand(Handedness::Left) => &mut self.left,
            Slot::Hand(Handedness::Right) => &mut self.right,
        }
    }

    /// Process one frame's admitted hands, in detector order.
    pub fn process_frame(&mut self, poses: &[HandPose]) -> FrameReport {
        self.frames += 1;
        let frame = self.frames;

        let hands: Vec<HandReport> = poses
            .iter()
            .enumerate()
            .map(|(index, pose)| self.classify_hand(frame, index, pose))
            .collect();

        let mut report = FrameReport {
            frame,
            event: GestureEvent::None,
            hands,
            confirmed: Vec::new(),
        };

        if !self.config.enabled {
            return report;
        }

        match self.config.slot_policy {
            SlotPolicy::Global => {
                if report.hands.is_empty() {
                    self.global.observe(GestureCategory::Unknown);
                }
                for hand in &report.hands {
                    let event = self.global.observe(hand.category);
                    if !event.is_none() {
                        report.confirmed.push((Slot::Global, event));
                    }
                }
            }
            SlotPolicy::PerHand => {
                for handedness in [Handedness::Left, Handedness::Right] {
                    let category = report
                        .hands
                        .iter()
                        .find(|h| h.handedness == handedness)
                        .map(|h| h.category)
                        .unwrap_or(GestureCategory::Unknown);
                    let slot = Slot::Hand(handedness);
                    let event = self.slot_mut(slot).observe(category);
                    if !event.is_none() {
                        report.confirmed.push((slot, event));
                    }
                }
            }
        }

        if let Some(&(_, event)) = report.confirmed.last() {
            report.event = event;
        }
        for &(slot, event) in &report.confirmed {
            match event {
                GestureEvent::Distress => self.distress_count += 1,
                GestureEvent::Acknowledge => self.acknowledge_count += 1,
                GestureEvent::None => {}
            }
            self.last_event = event;
            info!(frame, slot = slot.as_str(), "gesture confirmed: {}", event.as_str());
        }

        report
    }

    fn classify_hand(&self, frame: u64, index: usize, pose: &HandPose) -> HandReport {
        let (category, error) = match classify(pose, self.config.curl_margin) {
            Ok(category) => (category, None),
            Err(e) => {
                warn!(frame, index, "skipping classification: {}", e);
                (GestureCategory::Unknown, Some(e))
            }
        };
        debug!(
            frame,
            index,
            "hand {} -> {}",
            pose.handedness.as_str(),
            category.as_str()
        );
        HandReport {
            index,
            handedness: pose.handedness,
            confidence: pose.confidence,
            category,
            error,
        }
    }

    /// Drop progress in every slot.
    pub fn reset(&mut self) {
        self.global.reset();
        self.left.reset();
        self.right.reset();
        self.last_event = GestureEvent::None;
    }

    /// Generate s-expression for protocol status.
    pub fn status_sexp(&self) -> String {
        let slots = match self.config.slot_policy {
            SlotPolicy::Global => format!(":global {}", self.global.status_sexp()),
            SlotPolicy::PerHand => format!(
                ":left {} :right {}",
                self.left.status_sexp(),
                self.right.status_sexp()
            ),
        };
        format!(
            "(:enabled {} :slot-policy :{} :frames {} :distress {} :acknowledge {} :last-event :{} {})",
            if self.config.enabled { "t" } else { "nil" },
            self.config.slot_policy.as_str(),
            self.frames,
            self.distress_count,
            self.acknowledge_count,
            self.last_event.as_str(),
            slots,
        )
    }

    /// Generate s-expression for protocol config.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:enabled {} :margin {:.3} :confirm-frames {} :slot-policy :{})",
            if self.config.enabled { "t" } else { "nil" },
            self.config.curl_margin,
            self.config.confirm_frames,
            self.config.slot_policy.as_str(),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────

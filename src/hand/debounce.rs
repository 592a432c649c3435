//! Consecutive-frame debounce for gesture categories.
//!
//! Turns a noisy per-frame classification stream into confirmed events.
//! A run only counts while the same category arrives on every frame; any
//! other category (including `Unknown`) resets progress. There is no
//! time-based decay.

use super::gesture::GestureCategory;

/// Frames of the same category needed to confirm a gesture.
pub const DEFAULT_CONFIRM_FRAMES: u32 = 3;

// ── Events ─────────────────────────────────────────────────

/// Outcome of one debounce step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    None,
    /// Confirmed fist run.
    Distress,
    /// Confirmed thumbs-up run.
    Acknowledge,
}

impl GestureEvent {
    /// String representation for protocol output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Distress => "distress",
            Self::Acknowledge => "acknowledge",
        }
    }

    /// Text shown by the overlay layer, if any.
    pub fn overlay_text(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Distress => Some("SOS"),
            Self::Acknowledge => Some("OK"),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

// ── State machine ──────────────────────────────────────────

/// Counter pair for one hand slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    confirm_frames: u32,
    fist_run: u32,
    thumb_run: u32,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_FRAMES)
    }
}

impl Debouncer {
    /// `confirm_frames` below 1 is treated as 1.
    pub fn new(confirm_frames: u32) -> Self {
        Self {
            confirm_frames: confirm_frames.max(1),
            fist_run: 0,
            thumb_run: 0,
        }
    }

    /// Feed one frame's category and return the resulting event.
    pub fn observe(&mut self, category: GestureCategory) -> GestureEvent {
        match category {
            GestureCategory::Fist => {
                self.fist_run += 1;
                self.thumb_run = 0;
                if self.fist_run >= self.confirm_frames {
                    self.fist_run = 0;
                    return GestureEvent::Distress;
                }
            }
            GestureCategory::ThumbsUp => {
                self.thumb_run += 1;
                self.fist_run = 0;
                if self.thumb_run >= self.confirm_frames {
                    self.thumb_run = 0;
                    return GestureEvent::Acknowledge;
                }
            }
            GestureCategory::Unknown => {
                self.fist_run = 0;
                self.thumb_run = 0;
            }
        }
        GestureEvent::None
    }

    /// Drop any progress toward confirmation.
    pub fn reset(&mut self) {
        self.fist_run = 0;
        self.thumb_run = 0;
    }

    pub fn fist_run(&self) -> u32 {
        self.fist_run
    }

    pub fn thumb_run(&self) -> u32 {
        self.thumb_run
    }

    pub fn confirm_frames(&self) -> u32 {
        self.confirm_frames
    }

    /// S-expression fragment for status reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:fist-run {} :thumb-run {} :confirm-frames {})",
            self.fist_run, self.thumb_run, self.confirm_frames
        )
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use GestureCategory::{Fist, ThumbsUp, Unknown};

    fn feed(d: &mut Debouncer, seq: &[GestureCategory]) -> Vec<GestureEvent> {
        seq.iter().map(|c| d.observe(*c)).collect()
    }

    #[test]
    fn test_new_state() {
        let d = Debouncer::default();
        assert_eq!(d.fist_run(), 0);
        assert_eq!(d.thumb_run(), 0);
        assert_eq!(d.confirm_frames(), 3);
    }

    #[test]
    fn test_three_fists_confirm_distress() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[Fist, Fist, Fist]);
        assert_eq!(
            events,
            vec![GestureEvent::None, GestureEvent::None, GestureEvent::Distress]
        );
        assert_eq!(d.fist_run(), 0);
    }

    #[test]
    fn test_fourth_fist_restarts_run() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[Fist, Fist, Fist, Fist, Fist, Fist]);
        assert_eq!(events[3], GestureEvent::None);
        assert_eq!(events[4], GestureEvent::None);
        assert_eq!(events[5], GestureEvent::Distress);
        assert_eq!(
            events.iter().filter(|e| **e == GestureEvent::Distress).count(),
            2
        );
    }

    #[test]
    fn test_unknown_resets_progress() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[Fist, Fist, Unknown, Fist, Fist, Fist]);
        let confirmed: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == GestureEvent::Distress)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(confirmed, vec![5], "events: {:?}", events);
    }

    #[test]
    fn test_switching_category_resets_other_counter() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[ThumbsUp, ThumbsUp, Fist]);
        assert!(
            !events.contains(&GestureEvent::Acknowledge),
            "events: {:?}",
            events
        );
        assert_eq!(d.thumb_run(), 0);
        assert_eq!(d.fist_run(), 1);
    }

    #[test]
    fn test_three_thumbs_confirm_acknowledge() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[ThumbsUp, ThumbsUp, ThumbsUp]);
        assert_eq!(events[2], GestureEvent::Acknowledge);
        assert_eq!(d.thumb_run(), 0);
    }

    #[test]
    fn test_alternating_never_confirms() {
        let mut d = Debouncer::default();
        let events = feed(&mut d, &[Fist, ThumbsUp, Fist, ThumbsUp, Fist, ThumbsUp]);
        assert!(events.iter().all(|e| e.is_none()), "events: {:?}", events);
    }

    #[test]
    fn test_custom_confirm_frames() {
        let mut d = Debouncer::new(5);
        let events = feed(&mut d, &[Fist; 5]);
        assert_eq!(events[3], GestureEvent::None);
        assert_eq!(events[4], GestureEvent::Distress);
    }

    #[test]
    fn test_zero_confirm_frames_clamped() {
        let mut d = Debouncer::new(0);
        assert_eq!(d.confirm_frames(), 1);
        assert_eq!(d.observe(Fist), GestureEvent::Distress);
    }

    #[test]
    fn test_reset() {
        let mut d = Debouncer::default();
        feed(&mut d, &[Fist, Fist]);
        d.reset();
        assert_eq!(d.fist_run(), 0);
        assert_eq!(d.observe(Fist), GestureEvent::None);
    }

    #[test]
    fn test_overlay_text() {
        assert_eq!(GestureEvent::Distress.overlay_text(), Some("SOS"));
        assert_eq!(GestureEvent::Acknowledge.overlay_text(), Some("OK"));
        assert_eq!(GestureEvent::None.overlay_text(), None);
    }

    #[test]
    fn test_status_sexp() {
        let mut d = Debouncer::default();
        d.observe(ThumbsUp);
        let sexp = d.status_sexp();
        assert!(sexp.contains(":fist-run 0"));
        assert!(sexp.contains(":thumb-run 1"));
        assert!(lexpr::from_str(&sexp).is_ok());
    }
}

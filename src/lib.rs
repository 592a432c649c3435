//! hand-signal: debounced hand-gesture events from a live landmark stream.
//!
//! Per-frame hand poses are classified as FIST / THUMBS_UP / UNKNOWN and
//! confirmed over consecutive frames into DISTRESS and ACKNOWLEDGE events.

pub mod backend;
pub mod error;
pub mod frame_timing;
pub mod hand;
pub mod ipc;
pub mod state;

//! Message dispatch: parse one s-expression line and route it by `:type`.

use std::time::Instant;

use lexpr::Value;
use tracing::{debug, warn};

use crate::error::FrameError;
use crate::hand::SlotPolicy;
use crate::state::AppState;

use super::frame::{decode_hands, encode_report};
use super::sexp::{
    error_response, get_bool, get_float, get_int, get_keyword, get_value, ok_response,
};

/// Parse a message and dispatch it. Returns the response line, if any.
pub fn handle_message(state: &mut AppState, raw: &str) -> Option<String> {
    let started = Instant::now();
    let value = match lexpr::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            let err = FrameError::Malformed(e.to_string());
            warn!("{}", err);
            return Some(error_response(0, &err.to_string()));
        }
    };

    let msg_type = get_keyword(&value, "type");
    let msg_id = get_int(&value, "id").unwrap_or(0);

    match msg_type.as_deref() {
        Some("frame") => handle_frame(state, &value, started),
        Some("ping") => handle_ping(state, msg_id),
        Some("gesture-status") => handle_gesture_status(state, msg_id),
        Some("gesture-config") => handle_gesture_config(state, msg_id, &value),
        Some("gesture-reset") => handle_gesture_reset(state, msg_id),
        Some("source-config") => handle_source_config(state, msg_id, &value),
        Some("frame-timing") => handle_frame_timing(state, msg_id),
        Some(other) => Some(error_response(
            msg_id,
            &format!("unknown message type: {other}"),
        )),
        None => Some(error_response(msg_id, "missing :type field")),
    }
}

// ── Handlers ────────────────────────────────────────────────

fn handle_frame(state: &mut AppState, value: &Value, started: Instant) -> Option<String> {
    let msg_id = get_int(value, "id");
    match decode_hands(value) {
        Ok(hands) => {
            let report = state.process_frame(hands, started);
            Some(encode_report(&report, msg_id))
        }
        Err(e) => {
            warn!(frame = state.frames() + 1, "dropping frame: {}", e);
            Some(error_response(msg_id.unwrap_or(0), &e.to_string()))
        }
    }
}

fn handle_ping(state: &mut AppState, msg_id: i64) -> Option<String> {
    Some(format!(
        "(:type :response :id {} :status :ok :frames {})",
        msg_id,
        state.frames()
    ))
}

fn handle_gesture_status(state: &mut AppState, msg_id: i64) -> Option<String> {
    let status = state.tracker.status_sexp();
    Some(format!(
        "(:type :response :id {} :status :ok :gesture {})",
        msg_id, status
    ))
}

fn handle_gesture_config(state: &mut AppState, msg_id: i64, value: &Value) -> Option<String> {
    let mut config = state.tracker.config().clone();

    if let Some(enabled) = get_bool(value, "enabled") {
        config.enabled = enabled;
    }
    if get_value(value, "margin").is_some() {
        match get_float(value, "margin") {
            Some(m) if m.is_finite() && m >= 0.0 => config.curl_margin = m as f32,
            _ => return Some(error_response(msg_id, "invalid :margin (expected >= 0)")),
        }
    }
    if get_value(value, "confirm-frames").is_some() {
        match get_int(value, "confirm-frames") {
            Some(n) if n >= 1 && n <= u32::MAX as i64 => config.confirm_frames = n as u32,
            _ => {
                return Some(error_response(
                    msg_id,
                    "invalid :confirm-frames (expected integer >= 1)",
                ))
            }
        }
    }
    if let Some(policy) = get_keyword(value, "slot-policy") {
        match SlotPolicy::parse(&policy) {
            Some(p) => config.slot_policy = p,
            None => {
                return Some(error_response(
                    msg_id,
                    &format!("unknown slot policy: {policy} (global or per-hand)"),
                ))
            }
        }
    }

    state.tracker.set_config(config);
    debug!(msg_id, "gesture config updated");
    let config = state.tracker.config_sexp();
    Some(format!(
        "(:type :response :id {} :status :ok :gesture-config {})",
        msg_id, config
    ))
}

fn handle_gesture_reset(state: &mut AppState, msg_id: i64) -> Option<String> {
    state.tracker.reset();
    debug!(msg_id, "gesture state reset");
    Some(ok_response(msg_id))
}

fn handle_source_config(state: &mut AppState, msg_id: i64, value: &Value) -> Option<String> {
    let mut source = state.source.clone();

    if get_value(value, "min-confidence").is_some() {
        match get_float(value, "min-confidence") {
            Some(c) if (0.0..=1.0).contains(&c) => source.min_detection_confidence = c as f32,
            _ => {
                return Some(error_response(
                    msg_id,
                    "invalid :min-confidence (expected 0.0-1.0)",
                ))
            }
        }
    }
    if get_value(value, "max-hands").is_some() {
        match get_int(value, "max-hands") {
            Some(n) if n >= 1 => source.max_num_hands = n as usize,
            _ => {
                return Some(error_response(
                    msg_id,
                    "invalid :max-hands (expected integer >= 1)",
                ))
            }
        }
    }

    state.source = source;
    Some(format!(
        "(:type :response :id {} :status :ok :source-config {})",
        msg_id,
        state.source.config_sexp()
    ))
}

fn handle_frame_timing(state: &mut AppState, msg_id: i64) -> Option<String> {
    Some(format!(
        "(:type :response :id {} :status :ok :frame-timing {})",
        msg_id,
        state.timing.stats_sexp()
    ))
}

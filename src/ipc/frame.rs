//! Frame message codec.
//!
//! Input hands look like
//! `(:handedness :right :score 0.93 :landmarks ((0.51 0.62 0.0) ...))`;
//! `:score` defaults to 1.0 and each landmark carries 2 or 3 numbers.

use lexpr::Value;

use crate::error::FrameError;
use crate::hand::{FrameReport, HandPose, HandReport, Handedness, Landmark};

use super::sexp::{escape_string, format_event, get_keyword, get_value, list_items};

/// Decode the `:hands` list of a frame message. A missing or empty list
/// is an empty frame.
pub fn decode_hands(value: &Value) -> Result<Vec<HandPose>, FrameError> {
    let hands = match get_value(value, "hands") {
        Some(v) => list_items(v),
        None => return Ok(Vec::new()),
    };
    hands
        .into_iter()
        .enumerate()
        .map(|(index, hand)| decode_hand(index, hand))
        .collect()
}

fn decode_hand(index: usize, value: &Value) -> Result<HandPose, FrameError> {
    let label = get_keyword(value, "handedness").ok_or(FrameError::MissingField("handedness"))?;
    let handedness =
        Handedness::parse(&label).ok_or_else(|| FrameError::UnknownHandedness(label.clone()))?;

    let confidence = match get_keyword(value, "score") {
        Some(s) => s.parse::<f32>().map_err(|_| FrameError::InvalidValue {
            field: "score",
            value: s.clone(),
        })?,
        None => 1.0,
    };

    let points = get_value(value, "landmarks").ok_or(FrameError::MissingField("landmarks"))?;
    let landmarks = list_items(points)
        .into_iter()
        .enumerate()
        .map(|(landmark, point)| decode_landmark(index, landmark, point))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HandPose::new(handedness, landmarks, confidence))
}

fn decode_landmark(hand: usize, landmark: usize, value: &Value) -> Result<Landmark, FrameError> {
    let coords: Option<Vec<f32>> = list_items(value)
        .into_iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64().map(|f| f as f32),
            _ => None,
        })
        .collect();
    match coords.as_deref() {
        Some([x, y]) => Ok(Landmark::new(*x, *y)),
        Some([x, y, z]) => Ok(Landmark::with_depth(*x, *y, *z)),
        _ => Err(FrameError::BadLandmark { hand, landmark }),
    }
}

/// Encode a frame report as a `gesture-frame` event.
pub fn encode_report(report: &FrameReport, msg_id: Option<i64>) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();
    if let Some(id) = msg_id {
        fields.push(("id", id.to_string()));
    }
    fields.push(("frame", report.frame.to_string()));
    fields.push(("gesture", format!(":{}", report.event.as_str())));
    if let Some(text) = report.event.overlay_text() {
        fields.push(("overlay", format!("\"{}\"", text)));
    }
    fields.push(("hands", encode_list(report.hands.iter().map(encode_hand))));
    fields.push((
        "confirmed",
        encode_list(report.confirmed.iter().map(|(slot, event)| {
            format!("(:slot :{} :gesture :{})", slot.as_str(), event.as_str())
        })),
    ));
    format_event("gesture-frame", &fields)
}

fn encode_hand(hand: &HandReport) -> String {
    let mut s = format!(
        "(:index {} :handedness :{} :score {:.2} :category :{}",
        hand.index,
        hand.handedness.as_str(),
        hand.confidence,
        hand.category.as_str()
    );
    if let Some(e) = &hand.error {
        s.push_str(&format!(" :error \"{}\"", escape_string(&e.to_string())));
    }
    s.push(')');
    s
}

fn encode_list(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        return "nil".to_string();
    }
    format!("({})", items.join(" "))
}

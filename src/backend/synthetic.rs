//! Synthetic source: replay a scripted sequence of template poses.
//!
//! A script is a comma-separated list of steps. Each step is one frame's
//! hands joined by `+`, optionally repeated with `*N`:
//!
//! ```text
//! fist*3,open,none,l:thumbs-up+r:fist*2,malformed
//! ```
//!
//! Hands default to the right hand; `l:` / `r:` pick a side. `none` is an
//! empty frame.

use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info};

use super::{shutdown_requested, status_line, DriverConfig};
use crate::error::ScriptError;
use crate::hand::poses::{build_pose, PoseShape};
use crate::hand::{HandPose, Handedness};
use crate::ipc::frame::encode_report;
use crate::state::AppState;

/// One script step: the same hands replayed for `repeat` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub hands: Vec<HandPose>,
    pub repeat: u64,
}

/// Parse a script into steps. Repeats are expanded lazily at replay time.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (step, raw) in script.split(',').map(str::trim).enumerate() {
        if raw.is_empty() {
            continue;
        }
        let (body, repeat) = match raw.rsplit_once('*') {
            Some((body, count)) => {
                let n = count
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ScriptError::BadRepeat {
                        step,
                        count: count.to_string(),
                    })?;
                (body.trim(), n)
            }
            None => (raw, 1),
        };
        let hands = parse_frame(step, body)?;
        steps.push(ScriptStep { hands, repeat });
    }
    if steps.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(steps)
}

fn parse_frame(step: usize, body: &str) -> Result<Vec<HandPose>, ScriptError> {
    if body == "none" {
        return Ok(Vec::new());
    }
    body.split('+')
        .map(str::trim)
        .map(|hand| {
            let (handedness, shape) = match hand.split_once(':') {
                Some((side, shape)) => {
                    let handedness = match side {
                        "l" | "left" => Handedness::Left,
                        "r" | "right" => Handedness::Right,
                        _ => {
                            return Err(ScriptError::UnknownHand {
                                step,
                                label: side.to_string(),
                            })
                        }
                    };
                    (handedness, shape)
                }
                None => (Handedness::Right, hand),
            };
            let shape = PoseShape::parse(shape).ok_or_else(|| ScriptError::UnknownShape {
                step,
                shape: shape.to_string(),
            })?;
            Ok(build_pose(handedness, shape))
        })
        .collect()
}

/// Replay a script through the pipeline, writing one event line per frame.
pub fn run<W: Write>(
    state: &mut AppState,
    script: &str,
    out: &mut W,
    config: &DriverConfig,
) -> anyhow::Result<()> {
    let steps = parse_script(script).context("invalid synthetic script")?;
    let total = steps
        .iter()
        .fold(0u64, |sum, step| sum.saturating_add(step.repeat));
    info!("replaying {} synthetic frame(s) in {} step(s)", total, steps.len());

    let frames = steps
        .iter()
        .flat_map(|step| (0..step.repeat).map(move |_| &step.hands));
    for hands in frames {
        if !state.running {
            break;
        }
        if shutdown_requested() {
            info!("Shutdown signal received, exiting");
            state.running = false;
            break;
        }

        let report = state.process_frame(hands.clone(), Instant::now());
        debug!(frame = report.frame, gesture = report.event.as_str(), "synthetic frame");
        writeln!(out, "{}", encode_report(&report, None)).context("failed to write event")?;

        let count = state.frames();
        if config.status_due(count) {
            info!("Synthetic status: {}", status_line(state));
        }
        if config.limit_reached(count) {
            info!("Exit limit reached after {} frame(s)", count);
            state.running = false;
        }
    }
    out.flush()?;

    info!("Synthetic driver finished ({})", status_line(state));
    Ok(())
}

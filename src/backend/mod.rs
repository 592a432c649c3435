//! Frame drivers: a line-protocol stream reader and a scripted synthetic
//! source. Both own an `AppState` and share shutdown handling.

pub mod stream;
pub mod synthetic;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::state::AppState;

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Where frames come from.
#[derive(Debug, Clone)]
pub enum Driver {
    /// Read protocol lines from a file, or stdin for `-`.
    Stream(PathBuf),
    /// Replay a synthetic pose script.
    Synthetic(String),
}

/// Loop limits shared by both drivers.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Stop after this many frames (for CI).
    pub exit_after_frames: Option<u64>,
    /// Log a status line every N frames; 0 disables.
    pub status_interval: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            exit_after_frames: None,
            status_interval: 300,
        }
    }
}

impl DriverConfig {
    /// True once `frames` has reached the exit limit.
    pub fn limit_reached(&self, frames: u64) -> bool {
        self.exit_after_frames.is_some_and(|n| frames >= n)
    }

    /// True when a status line is due after `frames` frames.
    pub fn status_due(&self, frames: u64) -> bool {
        self.status_interval > 0 && frames > 0 && frames % self.status_interval == 0
    }
}

/// Run the selected driver to completion, writing output lines to stdout.
pub fn run(driver: Driver, mut state: AppState, config: DriverConfig) -> anyhow::Result<()> {
    install_signal_handlers();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match driver {
        Driver::Stream(path) => {
            let input = stream::open_input(&path)?;
            stream::run(&mut state, input, &mut out, &config)
        }
        Driver::Synthetic(script) => synthetic::run(&mut state, &script, &mut out, &config),
    }
}

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Whether a shutdown signal has arrived.
pub(crate) fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

/// One-line status summary for periodic logging.
pub(crate) fn status_line(state: &AppState) -> String {
    let stats = state.timing.stats();
    format!(
        "{} frame(s), {:.0} fps, p50 {:.2}ms, p99 {:.2}ms, {} slow",
        stats.total_frames, stats.fps, stats.process_p50, stats.process_p99, stats.slow_frames
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_reached() {
        let config = DriverConfig {
            exit_after_frames: Some(3),
            status_interval: 0,
        };
        assert!(!config.limit_reached(2));
        assert!(config.limit_reached(3));
        assert!(!DriverConfig::default().limit_reached(u64::MAX));
    }

    #[test]
    fn test_status_due() {
        let config = DriverConfig {
            exit_after_frames: None,
            status_interval: 10,
        };
        assert!(!config.status_due(0));
        assert!(!config.status_due(9));
        assert!(config.status_due(10));
        assert!(config.status_due(20));

        let off = DriverConfig {
            exit_after_frames: None,
            status_interval: 0,
        };
        assert!(!off.status_due(10));
    }

    #[test]
    fn test_status_line_counts_frames() {
        let mut state = AppState::default();
        state.timing.record_frame(None, 1.0);
        assert!(status_line(&state).starts_with("1 frame(s)"));
    }
}

//! Stream driver: read protocol lines, dispatch, write responses.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};

use super::{shutdown_requested, status_line, DriverConfig};
use crate::ipc;
use crate::state::AppState;

/// How long the loop waits for a line before re-checking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Lines buffered between the reader thread and the loop.
const LINE_BUFFER: usize = 64;

/// Open the frame input. `-` means stdin.
pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead + Send>> {
    if path.as_os_str() == "-" {
        info!("reading frames from stdin");
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)
        .with_context(|| format!("failed to open frame input {}", path.display()))?;
    info!("reading frames from {}", path.display());
    Ok(Box::new(BufReader::new(file)))
}

/// Process lines until EOF, a shutdown signal, or the frame limit.
pub fn run<R, W>(
    state: &mut AppState,
    input: R,
    out: &mut W,
    config: &DriverConfig,
) -> anyhow::Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    run_until(state, input, out, config, shutdown_requested)
}

/// Like [`run`], polling `stop` while waiting for input.
///
/// Blocking reads happen on a separate thread, so a stalled source never
/// holds up shutdown for more than one poll interval. The reader thread
/// is left blocked if the loop exits first.
pub fn run_until<R, W, F>(
    state: &mut AppState,
    input: R,
    out: &mut W,
    config: &DriverConfig,
    stop: F,
) -> anyhow::Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
    F: Fn() -> bool,
{
    let lines = spawn_reader(input)?;
    let mut last_status = 0;

    while state.running {
        if stop() {
            info!("Shutdown signal received, exiting");
            state.running = false;
            break;
        }

        let line = match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line.context("failed to read frame input")?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("frame input reached EOF");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = ipc::handle_message(state, line) {
            writeln!(out, "{}", response).context("failed to write response")?;
            out.flush()?;
        }

        let frames = state.frames();
        if frames != last_status && config.status_due(frames) {
            info!("Stream status: {}", status_line(state));
            last_status = frames;
        }
        if config.limit_reached(frames) {
            info!("Exit limit reached after {} frame(s)", frames);
            state.running = false;
        }
    }

    info!("Stream driver shutting down ({})", status_line(state));
    Ok(())
}

/// Read lines on a background thread. The channel disconnects at EOF or
/// after the first read error has been delivered.
fn spawn_reader<R: BufRead + Send + 'static>(
    input: R,
) -> anyhow::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::sync_channel(LINE_BUFFER);
    thread::Builder::new()
        .name("frame-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })
        .context("failed to spawn frame reader thread")?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::time::Instant;

    /// Input that blocks until its sender is dropped, then reads as EOF.
    struct Stalled(mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    fn run_lines(input: &str, config: &DriverConfig) -> (AppState, Vec<String>) {
        let mut state = AppState::default();
        let mut out = Vec::new();
        run(&mut state, Cursor::new(input.to_string()), &mut out, config).unwrap();
        let text = String::from_utf8(out).unwrap();
        (state, text.lines().map(str::to_string).collect())
    }

    #[test]
    fn test_one_response_per_message() {
        let input = "(:type :ping :id 1)\n\n   \n(:type :frame :id 2)\n(:type :bogus)\n";
        let (state, lines) = run_lines(input, &DriverConfig::default());
        assert_eq!(lines.len(), 3, "blank lines are skipped: {:?}", lines);
        assert!(lines[0].contains(":frames 0"));
        assert!(lines[1].contains(":event :gesture-frame"));
        assert!(lines[2].contains(":status :error"));
        assert_eq!(state.frames(), 1);
    }

    #[test]
    fn test_exit_after_frames() {
        let input = "(:type :frame)\n".repeat(10);
        let config = DriverConfig {
            exit_after_frames: Some(4),
            status_interval: 2,
        };
        let (state, lines) = run_lines(&input, &config);
        assert_eq!(lines.len(), 4);
        assert_eq!(state.frames(), 4);
        assert!(!state.running);
    }

    #[test]
    fn test_non_frame_messages_do_not_count() {
        let input = "(:type :ping)\n(:type :gesture-status)\n(:type :frame)\n";
        let config = DriverConfig {
            exit_after_frames: Some(1),
            status_interval: 0,
        };
        let (state, lines) = run_lines(input, &config);
        assert_eq!(lines.len(), 3);
        assert_eq!(state.frames(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let err = match open_input(Path::new("/nonexistent/frames.sexp")) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("failed to open frame input"));
    }

    #[test]
    fn test_stop_while_input_stalled() {
        let (hold, rx) = mpsc::channel::<()>();
        let input = BufReader::new(Stalled(rx));
        let mut state = AppState::default();
        let mut out = Vec::new();

        let started = Instant::now();
        let deadline = Duration::from_millis(250);
        run_until(&mut state, input, &mut out, &DriverConfig::default(), || {
            started.elapsed() >= deadline
        })
        .unwrap();

        assert!(
            started.elapsed() < Duration::from_secs(5),
            "driver waited on input: {:?}",
            started.elapsed()
        );
        assert!(!state.running);
        assert!(out.is_empty());
        drop(hold);
    }

    #[test]
    fn test_read_error_is_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            }
        }
        let mut state = AppState::default();
        let mut out = Vec::new();
        let err = run(
            &mut state,
            BufReader::new(Broken),
            &mut out,
            &DriverConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read frame input"));
    }
}

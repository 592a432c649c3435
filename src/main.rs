//! hand-signal: turn a hand-landmark stream into DISTRESS / ACKNOWLEDGE
//! events.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use hand_signal::backend::{self, Driver, DriverConfig};
use hand_signal::hand::{GestureConfig, SlotPolicy, SourceConfig};
use hand_signal::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "hand-signal", about = "Debounced hand-gesture events")]
struct Cli {
    /// Frame input: s-expression lines from a file, or - for stdin
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Replay a synthetic pose script instead of reading input
    /// (e.g. "fist*3,open,thumbs-up*3")
    #[arg(long)]
    synthetic: Option<String>,

    /// Curl margin in normalized image units
    #[arg(long, default_value_t = hand_signal::hand::DEFAULT_CURL_MARGIN)]
    margin: f32,

    /// Consecutive frames required to confirm a gesture
    #[arg(long, default_value_t = hand_signal::hand::DEFAULT_CONFIRM_FRAMES)]
    confirm_frames: u32,

    /// Debounce slots: global or per-hand
    #[arg(long, default_value = "global")]
    slot_policy: String,

    /// Drop detections below this confidence (0.0-1.0)
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Maximum hands admitted per frame
    #[arg(long)]
    max_hands: Option<usize>,

    /// Exit after N frames (testing)
    #[arg(long)]
    exit_after_frames: Option<u64>,

    /// Log a status line every N frames (0 disables)
    #[arg(long, default_value_t = 300)]
    status_interval: u64,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("hand-signal {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logs go to stderr; stdout carries protocol output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_signal=info".into()),
        )
        .init();

    info!("hand-signal v{} starting", env!("CARGO_PKG_VERSION"));

    let Some(slot_policy) = SlotPolicy::parse(&cli.slot_policy) else {
        anyhow::bail!(
            "unknown slot policy: {}. Use: global or per-hand",
            cli.slot_policy
        );
    };
    if !cli.margin.is_finite() || cli.margin < 0.0 {
        anyhow::bail!("--margin must be >= 0, got {}", cli.margin);
    }
    if cli.confirm_frames == 0 {
        anyhow::bail!("--confirm-frames must be at least 1");
    }

    let gesture = GestureConfig {
        curl_margin: cli.margin,
        confirm_frames: cli.confirm_frames,
        slot_policy,
        ..GestureConfig::default()
    };

    let mut source = SourceConfig::default();
    if let Some(c) = cli.min_confidence {
        if !(0.0..=1.0).contains(&c) {
            anyhow::bail!("--min-confidence must be within 0.0-1.0, got {c}");
        }
        source.min_detection_confidence = c;
    }
    if let Some(n) = cli.max_hands {
        if n == 0 {
            anyhow::bail!("--max-hands must be at least 1");
        }
        source.max_num_hands = n;
    }

    let driver = match cli.synthetic {
        Some(script) => {
            info!("driver: synthetic");
            Driver::Synthetic(script)
        }
        None => {
            info!("driver: stream");
            Driver::Stream(cli.input)
        }
    };
    let config = DriverConfig {
        exit_after_frames: cli.exit_after_frames,
        status_interval: cli.status_interval,
    };

    backend::run(driver, AppState::new(gesture, source), config)
}

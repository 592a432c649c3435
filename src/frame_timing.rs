//! Frame timing instrumentation for the gesture pipeline.
//!
//! Tracks per-frame processing time and the interval between frames,
//! keeping rolling windows for percentile and FPS reporting.

use std::time::Instant;

/// Rolling frame timing statistics over a window of samples.
#[derive(Debug)]
pub struct FrameTiming {
    /// Per-frame pipeline time (decode through report).
    pub process_times: Vec<f64>,
    /// Time between the starts of consecutive frames.
    pub intervals: Vec<f64>,
    /// Maximum number of samples to keep.
    pub window_size: usize,
    /// Total frames recorded.
    pub total_frames: u64,
    /// Frames whose processing exceeded the budget.
    pub slow_frames: u64,
    /// Processing budget in milliseconds (33.3 for 30 Hz input).
    pub budget_ms: f64,
    last_frame_start: Option<Instant>,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(300, 33.3)
    }
}

impl FrameTiming {
    pub fn new(window_size: usize, budget_ms: f64) -> Self {
        Self {
            process_times: Vec::with_capacity(window_size),
            intervals: Vec::with_capacity(window_size),
            window_size,
            total_frames: 0,
            slow_frames: 0,
            budget_ms,
            last_frame_start: None,
        }
    }

    /// Record a frame that started at `started` and has just finished.
    pub fn record(&mut self, started: Instant) {
        let process_ms = started.elapsed().as_secs_f64() * 1000.0;
        let interval_ms = self
            .last_frame_start
            .map(|prev| started.duration_since(prev).as_secs_f64() * 1000.0);
        self.last_frame_start = Some(started);
        self.record_frame(interval_ms, process_ms);
    }

    /// Record a frame's timing data. `interval_ms` is None for the first frame.
    pub fn record_frame(&mut self, interval_ms: Option<f64>, process_ms: f64) {
        Self::push_sample(&mut self.process_times, process_ms, self.window_size);
        if let Some(interval) = interval_ms {
            Self::push_sample(&mut self.intervals, interval, self.window_size);
        }

        self.total_frames += 1;
        if process_ms > self.budget_ms {
            self.slow_frames += 1;
        }
    }

    fn push_sample(samples: &mut Vec<f64>, value: f64, window_size: usize) {
        samples.push(value);
        if samples.len() > window_size {
            samples.remove(0);
        }
    }

    /// Compute percentile from a sorted slice.
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let idx = ((sorted.len() as f64 - 1.0) * p / 100.0).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    fn fps_from_ms(ms: f64) -> f64 {
        if ms > 0.0 {
            1000.0 / ms
        } else {
            0.0
        }
    }

    /// Get timing statistics as percentiles.
    pub fn stats(&self) -> FrameTimingStats {
        let mut process = self.process_times.clone();
        let mut intervals = self.intervals.clone();

        process.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let interval_p50 = Self::percentile(&intervals, 50.0);
        FrameTimingStats {
            process_p50: Self::percentile(&process, 50.0),
            process_p99: Self::percentile(&process, 99.0),
            interval_p50,
            fps: Self::fps_from_ms(interval_p50),
            current_fps: self
                .intervals
                .last()
                .map(|ms| Self::fps_from_ms(*ms))
                .unwrap_or(0.0),
            slow_pct: if self.total_frames > 0 {
                (self.slow_frames as f64 / self.total_frames as f64) * 100.0
            } else {
                0.0
            },
            total_frames: self.total_frames,
            slow_frames: self.slow_frames,
        }
    }

    /// Format stats as an s-expression for protocol output.
    pub fn stats_sexp(&self) -> String {
        let s = self.stats();
        format!(
            "(:process-p50 {:.2} :process-p99 {:.2} :interval-p50 {:.1} :fps {:.0} :current-fps {:.0} :slow-pct {:.1} :total-frames {} :slow-frames {})",
            s.process_p50, s.process_p99, s.interval_p50, s.fps, s.current_fps,
            s.slow_pct, s.total_frames, s.slow_frames,
        )
    }
}

/// Computed frame timing statistics.
#[derive(Debug, Clone)]
pub struct FrameTimingStats {
    pub process_p50: f64,
    pub process_p99: f64,
    pub interval_p50: f64,
    /// FPS from the median interval.
    pub fps: f64,
    /// FPS from the most recent interval.
    pub current_fps: f64,
    pub slow_pct: f64,
    pub total_frames: u64,
    pub slow_frames: u64,
}

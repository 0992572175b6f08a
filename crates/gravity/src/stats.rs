use std::time::Duration;

/// How often the frame summary is logged at debug level.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Frame counters for the periodic and exit summaries.
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    drawn: u64,
    skipped: u64,
    total: Duration,
    since_report: Duration,
    frames_since_report: u64,
    slowest: Duration,
}

/// Snapshot emitted once per [`REPORT_INTERVAL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames: u64,
    pub fps: f64,
    pub slowest: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one loop iteration that took `elapsed`; returns a report once
    /// [`REPORT_INTERVAL`] has accumulated since the last one.
    pub fn record(&mut self, drawn: bool, elapsed: Duration) -> Option<FrameReport> {
        if drawn {
            self.drawn += 1;
        } else {
            self.skipped += 1;
        }
        self.total += elapsed;
        self.since_report += elapsed;
        self.frames_since_report += 1;
        self.slowest = self.slowest.max(elapsed);

        if self.since_report < REPORT_INTERVAL {
            return None;
        }
        let report = FrameReport {
            frames: self.frames_since_report,
            fps: rate(self.frames_since_report, self.since_report),
            slowest: self.slowest,
        };
        self.since_report = Duration::ZERO;
        self.frames_since_report = 0;
        self.slowest = Duration::ZERO;
        Some(report)
    }

    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Average frames per second across the whole run.
    pub fn average_fps(&self) -> f64 {
        rate(self.drawn + self.skipped, self.total)
    }
}

fn rate(frames: u64, over: Duration) -> f64 {
    let seconds = over.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }
    frames as f64 / seconds
}

use crate::config::MonitorConfig;

/// Statistics for one closed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    /// Time the window opened
    pub start_ms: u64,
    /// Time the window closed
    pub end_ms: u64,
    /// Number of samples
    pub count: u32,
    /// Sum of all samples
    pub sum: u64,
    /// Minimum sample
    pub min: u16,
    /// Maximum sample
    pub max: u16,
}

impl WindowSummary {
    /// Arithmetic mean of the window (not truncated).
    pub fn average(&self) -> f32 {
        self.sum as f32 / self.count as f32
    }

    /// A window is loud when either its average or its peak reaches the limit.
    pub fn is_loud(&self, config: &MonitorConfig) -> bool {
        self.average() >= f32::from(config.avg_threshold) || self.max >= config.max_threshold
    }
}

/// Running sum/min/max of the samples seen since the window opened.
pub struct WindowAggregator {
    start_ms: u64,
    count: u32,
    sum: u64,
    min: u16,
    max: u16,
}

impl WindowAggregator {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            start_ms,
            count: 0,
            sum: 0,
            min: u16::MAX,
            max: u16::MIN,
        }
    }

    pub const fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub fn observe(&mut self, raw: u16) {
        self.count += 1;
        self.sum += u64::from(raw);
        self.min = self.min.min(raw);
        self.max = self.max.max(raw);
    }

    /// Close the window and open the next one at `now_ms`.
    ///
    /// An empty window produces no summary.
    pub fn close(&mut self, now_ms: u64) -> Option<WindowSummary> {
        let closed = core::mem::replace(self, Self::new(now_ms));
        if closed.count == 0 {
            return None;
        }

        Some(WindowSummary {
            start_ms: closed.start_ms,
            end_ms: now_ms,
            count: closed.count,
            sum: closed.sum,
            min: closed.min,
            max: closed.max,
        })
    }
}

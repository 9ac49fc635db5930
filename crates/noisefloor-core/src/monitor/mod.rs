//! Host-side analysis of the report stream
//!
//! The device only emits per-sample lines. A collector on the other end of the
//! serial link folds them into fixed-length windows (average, minimum, maximum)
//! and raises an alert for individual samples that spike above a hard limit.
//!
//! ## Timing
//!
//! All methods take the current time in milliseconds from the caller so the
//! logic stays independent of any clock source.
//!
//! ```rust,ignore
//! let mut monitor = Monitor::new(MonitorConfig::DEFAULT, now_ms);
//!
//! // For every parsed line
//! if let Some(spike) = monitor.ingest(now_ms, raw) { ... }
//!
//! // Periodically
//! if let Some(summary) = monitor.tick(now_ms) { ... }
//! ```

mod spike;
mod window;

pub use spike::{SpikeAlert, SpikeDetector};
pub use window::{WindowAggregator, WindowSummary};

use crate::config::MonitorConfig;

/// Window aggregation and spike detection over one report stream.
pub struct Monitor {
    config: MonitorConfig,
    window: WindowAggregator,
    spikes: SpikeDetector,
}

impl Monitor {
    pub fn new(config: MonitorConfig, now_ms: u64) -> Self {
        Self {
            config,
            window: WindowAggregator::new(now_ms),
            spikes: SpikeDetector::new(config),
        }
    }

    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Fold one raw sample into the current window and check it for a spike.
    pub fn ingest(&mut self, now_ms: u64, raw: u16) -> Option<SpikeAlert> {
        self.window.observe(raw);
        self.spikes.check(now_ms, raw)
    }

    /// Close the current window once it has run for `window_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Option<WindowSummary> {
        if now_ms.saturating_sub(self.window.start_ms()) < self.config.window_ms {
            return None;
        }
        self.window.close(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_closes_after_period() {
        let mut monitor = Monitor::new(MonitorConfig::DEFAULT, 0);
        monitor.ingest(100, 500);
        monitor.ingest(200, 520);

        assert!(monitor.tick(59_999).is_none());

        let summary = monitor.tick(60_000).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min, 500);
        assert_eq!(summary.max, 520);
        assert!(!summary.is_loud(monitor.config()));

        // The next window starts where the previous one closed.
        assert!(monitor.tick(60_001).is_none());
    }

    #[test]
    fn test_spike_and_loud_window() {
        let mut monitor = Monitor::new(MonitorConfig::DEFAULT, 0);
        assert!(monitor.ingest(10, 650).is_some());
        assert!(monitor.ingest(20, 700).is_none());

        let summary = monitor.tick(60_000).unwrap();
        assert!(summary.is_loud(monitor.config()));
    }
}

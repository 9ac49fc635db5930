//! Host-side consumer of the report stream
//!
//! Parses each line the sensor emits and feeds it to a [`Monitor`], logging
//! spikes and the per-window statistics. Lines that are not valid reports are
//! skipped with a warning.

use log::{info, warn};
use noisefloor_core::config::MonitorConfig;
use noisefloor_core::monitor::{Monitor, SpikeAlert, WindowSummary};
use serde::Deserialize;
use thiserror_no_std::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Invalid JSON from sensor: {line}")]
    InvalidJson { line: String },
}

/// The only field the collector needs. `baseline` and `loud` are optional.
#[derive(Deserialize)]
struct RawOnly {
    raw: u16,
}

/// Running totals since the collector started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub samples: u64,
    pub rejected: u64,
    pub spikes: u64,
    pub windows: u64,
    pub last_window: Option<WindowSummary>,
}

pub struct Collector {
    monitor: Monitor,
    stats: CollectorStats,
}

impl Collector {
    pub fn new(config: MonitorConfig, now_ms: u64) -> Self {
        Self {
            monitor: Monitor::new(config, now_ms),
            stats: CollectorStats::default(),
        }
    }

    pub const fn stats(&self) -> &CollectorStats {
        &self.stats
    }

    /// Extract `raw` from one line, surrounding whitespace (including `\r`) ignored.
    pub fn parse_line(line: &str) -> Result<Option<u16>, CollectorError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<RawOnly>(line)
            .map(|sample| Some(sample.raw))
            .map_err(|_| CollectorError::InvalidJson {
                line: line.to_owned(),
            })
    }

    pub fn ingest_line(&mut self, now_ms: u64, line: &str) -> Option<SpikeAlert> {
        let raw = match Self::parse_line(line) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("{}", e);
                self.stats.rejected += 1;
                return None;
            }
        };

        self.stats.samples += 1;
        let spike = self.monitor.ingest(now_ms, raw);
        if let Some(spike) = spike {
            info!("Spike detected (raw={}) at {} ms", spike.raw, spike.at_ms);
            self.stats.spikes += 1;
        }
        spike
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<WindowSummary> {
        let summary = self.monitor.tick(now_ms)?;
        info!(
            "Window {}..{} ms: avg={:.1}, min={}, max={} ({} samples)",
            summary.start_ms,
            summary.end_ms,
            summary.average(),
            summary.min,
            summary.max,
            summary.count
        );
        if summary.is_loud(self.monitor.config()) {
            info!("Loud window (avg={:.1}, max={})", summary.average(), summary.max);
        }
        self.stats.windows += 1;
        self.stats.last_window = Some(summary);
        Some(summary)
    }
}

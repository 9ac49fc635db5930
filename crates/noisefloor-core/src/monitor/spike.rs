use crate::config::MonitorConfig;

/// A single sample at or above the spike threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeAlert {
    pub at_ms: u64,
    pub raw: u16,
}

/// Reports spikes, at most one per cooldown period.
pub struct SpikeDetector {
    threshold: u16,
    cooldown_ms: u64,
    last_reported_ms: Option<u64>,
}

impl SpikeDetector {
    pub const fn new(config: MonitorConfig) -> Self {
        Self {
            threshold: config.spike_threshold,
            cooldown_ms: config.spike_cooldown_ms,
            last_reported_ms: None,
        }
    }

    pub fn check(&mut self, now_ms: u64, raw: u16) -> Option<SpikeAlert> {
        if raw < self.threshold {
            return None;
        }

        let cooled_down = match self.last_reported_ms {
            Some(last) => now_ms.saturating_sub(last) > self.cooldown_ms,
            None => true,
        };
        if !cooled_down {
            return None;
        }

        self.last_reported_ms = Some(now_ms);
        Some(SpikeAlert { at_ms: now_ms, raw })
    }
}

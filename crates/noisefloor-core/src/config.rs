//! Compile-time tunables for the sketch and the host-side monitor

use core::fmt::Write;
use core::num::NonZeroU16;

use serde::{Deserialize, Serialize};

/// Configuration shared by the calibrator and the reporter.
///
/// Every value is fixed at build time on the device; the struct exists so the
/// tests (and the simulator) can inject their own values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchConfig {
    /// ADC input channel the microphone is wired to (0 = "A0").
    pub input_channel: u8,
    /// Margin above the baseline a sample must exceed to be loud.
    pub threshold_offset: u16,
    /// Number of samples averaged into the baseline.
    pub calibration_samples: NonZeroU16,
    /// Pause after each calibration sample.
    pub calibration_interval_ms: u32,
    /// Pause after each emitted report.
    pub report_interval_ms: u32,
    /// Settling time before calibration starts.
    pub startup_delay_ms: u32,
    /// Serial link rate.
    pub baud_rate: u32,
}

impl SketchConfig {
    pub const DEFAULT: Self = Self {
        input_channel: 0,
        threshold_offset: 40,
        calibration_samples: match NonZeroU16::new(100) {
            Some(n) => n,
            None => unreachable!(),
        },
        calibration_interval_ms: 5,
        report_interval_ms: 50,
        startup_delay_ms: 1000,
        baud_rate: 9600,
    };

    /// Logical name of the input channel, e.g. `A0`.
    pub fn channel_label(&self) -> heapless::String<4> {
        let mut label = heapless::String::new();
        // "A" plus at most three digits always fits.
        let _ = write!(label, "A{}", self.input_channel);
        label
    }

    /// Blocking startup latency: settle time plus the whole calibration run.
    ///
    /// Saturates at `u32::MAX` for oversized custom values.
    pub const fn startup_latency_ms(&self) -> u32 {
        let sampling =
            (self.calibration_samples.get() as u32).saturating_mul(self.calibration_interval_ms);
        self.startup_delay_ms.saturating_add(sampling)
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Thresholds used by the host-side monitor when summarising the report stream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Length of one aggregation window.
    pub window_ms: u64,
    /// A window whose average reaches this value is loud.
    pub avg_threshold: u16,
    /// A window whose maximum reaches this value is loud.
    pub max_threshold: u16,
    /// A single sample reaching this value is a spike.
    pub spike_threshold: u16,
    /// Minimum spacing between two reported spikes.
    pub spike_cooldown_ms: u64,
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        window_ms: 60_000,
        avg_threshold: 550,
        max_threshold: 600,
        spike_threshold: 600,
        spike_cooldown_ms: 5_000,
    };
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

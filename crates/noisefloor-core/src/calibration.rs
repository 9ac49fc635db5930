//! Startup noise-floor calibration

use embedded_hal_async::delay::DelayNs;
use log::info;

use crate::config::SketchConfig;
use crate::sensors::{SoundSource, read_or_floor};

/// Resting noise level in raw converter counts.
///
/// Produced once by the [`Calibrator`] and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline(u16);

impl Baseline {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Truncating mean of `samples`, or `None` when there are none.
    pub fn from_samples(samples: &[u16]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
        Some(Self((sum / samples.len() as u64) as u16))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// The loudness boundary, widened so it cannot wrap.
    pub const fn threshold(self, offset: u16) -> u32 {
        self.0 as u32 + offset as u32
    }
}

/// Computes the [`Baseline`] from a burst of evenly spaced samples.
///
/// The run waits `startup_delay_ms` for the link and the microphone to settle,
/// then takes `calibration_samples` reads with `calibration_interval_ms`
/// between them. A failed read counts as 0; calibration itself cannot fail.
pub struct Calibrator {
    config: SketchConfig,
}

impl Calibrator {
    pub const fn new(config: SketchConfig) -> Self {
        Self { config }
    }

    pub async fn calibrate<S, D>(&self, source: &mut S, delay: &mut D) -> Baseline
    where
        S: SoundSource,
        D: DelayNs,
    {
        let count = self.config.calibration_samples.get();
        info!(
            "Calibrating noise floor on {} ({} samples)",
            self.config.channel_label(),
            count
        );

        delay.delay_ms(self.config.startup_delay_ms).await;

        // u16::MAX samples of u16::MAX still fit in a u32.
        let mut sum: u32 = 0;
        for _ in 0..count {
            sum += u32::from(read_or_floor(source).await);
            delay.delay_ms(self.config.calibration_interval_ms).await;
        }

        let baseline = Baseline((sum / u32::from(count)) as u16);
        info!("Baseline: {}", baseline.value());
        baseline
    }
}

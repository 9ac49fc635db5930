//! Stand-ins for the hardware the firmware talks to

use std::time::Duration;

use embedded_hal_async::delay::DelayNs;
use noisefloor_core::sensors::{SensorError, SoundSource};

/// Samples between the starts of two loud bursts (10 s at the report cadence).
const BURST_PERIOD: u64 = 200;

/// Length of one loud burst in samples.
const BURST_LENGTH: u64 = 20;

/// Deterministic microphone: a quiet floor with a small ripple, interrupted by
/// periodic bursts that decay back to the floor.
///
/// Calibration (the first 100 samples) never overlaps a burst.
pub struct SyntheticMicrophone {
    floor: u16,
    burst_peak: u16,
    samples: u64,
}

impl SyntheticMicrophone {
    pub fn new(floor: u16, burst_peak: u16) -> Self {
        Self {
            floor,
            burst_peak,
            samples: 0,
        }
    }

    fn next_value(&mut self) -> u16 {
        let n = self.samples;
        self.samples += 1;

        let t = n as f64;
        let ripple = 6.0 * (t / 7.0).sin() + 3.0 * (t / 3.0).cos();
        let mut value = f64::from(self.floor) + ripple;

        let phase = n % BURST_PERIOD;
        let burst_start = BURST_PERIOD - BURST_LENGTH;
        if phase >= burst_start {
            let progress = (phase - burst_start) as f64 / BURST_LENGTH as f64;
            value += f64::from(self.burst_peak.saturating_sub(self.floor)) * (1.0 - progress);
        }

        value.clamp(0.0, 1023.0) as u16
    }
}

impl SoundSource for SyntheticMicrophone {
    async fn read(&mut self) -> Result<u16, SensorError> {
        Ok(self.next_value())
    }
}

/// Blocking wall-clock delay.
pub struct StdDelay;

impl DelayNs for StdDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    async fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

//! Analog microphone on ADC1

use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::peripherals::{ADC1, GPIO1};
use log::error;
use noisefloor_core::sensors::{SensorError, SoundSource};

/// The ADC converts at 12 bits; reports use the 10-bit scale the thresholds
/// were tuned for.
const RESOLUTION_SHIFT: u8 = 2;

/// Microphone module wired to GPIO1, which is ADC1 channel 0 ("A0").
///
/// 11 dB attenuation gives the full 0-3.3 V swing of the module's analog output.
pub struct Microphone<'d> {
    adc: Adc<'d, ADC1<'d>, Blocking>,
    pin: AdcPin<GPIO1<'d>, ADC1<'d>>,
}

impl<'d> Microphone<'d> {
    pub fn new(adc: ADC1<'d>, pin: GPIO1<'d>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(pin, Attenuation::_11dB);
        Self {
            adc: Adc::new(adc, config),
            pin,
        }
    }
}

impl SoundSource for Microphone<'_> {
    async fn read(&mut self) -> Result<u16, SensorError> {
        loop {
            match self.adc.read_oneshot(&mut self.pin) {
                Ok(raw) => return Ok(raw >> RESOLUTION_SHIFT),
                // Conversion still running, let the executor do something else.
                Err(nb::Error::WouldBlock) => embassy_futures::yield_now().await,
                Err(nb::Error::Other(e)) => {
                    error!("ADC1 oneshot read failed: {:?}", e);
                    return Err(SensorError::ReadFailed {
                        sensor: "microphone",
                        operation: "read ADC1 channel 0",
                        details: "oneshot conversion error",
                    });
                }
            }
        }
    }
}

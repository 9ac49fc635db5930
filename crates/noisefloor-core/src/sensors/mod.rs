mod scripted;

use thiserror_no_std::Error;

pub use scripted::ScriptedSource;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: failed to {operation} ({details})")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: no sample available")]
    NotReady { sensor: &'static str },
}

/// An analog input producing one raw converter count per read.
///
/// The value is in the converter's native range (0-1023 for a 10-bit ADC).
/// Implementations do not validate or clamp it.
pub trait SoundSource {
    /// Read the next sample.
    fn read(&mut self) -> impl Future<Output = Result<u16, SensorError>>;
}

impl<T: SoundSource + ?Sized> SoundSource for &mut T {
    fn read(&mut self) -> impl Future<Output = Result<u16, SensorError>> {
        T::read(self)
    }
}

/// Read a sample, degrading a failed read to 0.
///
/// A disconnected or failing microphone surfaces only as an implausible value,
/// never as an error to the caller.
pub(crate) async fn read_or_floor<S: SoundSource>(source: &mut S) -> u16 {
    match source.read().await {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Sound source read failed, using 0: {}", e);
            0
        }
    }
}

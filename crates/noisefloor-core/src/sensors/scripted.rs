use alloc::vec::Vec;

use super::{SensorError, SoundSource};

/// Deterministic source replaying a fixed script of samples.
///
/// Once the script is exhausted it starts over from the beginning. Individual
/// positions can be marked as failing to exercise degraded reads.
pub struct ScriptedSource {
    script: Vec<Result<u16, SensorError>>,
    position: usize,
    reads: usize,
}

impl ScriptedSource {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            script: samples.iter().copied().map(Ok).collect(),
            position: 0,
            reads: 0,
        }
    }

    /// A source returning the same value forever.
    pub fn constant(value: u16) -> Self {
        Self::new(&[value])
    }

    /// Replace the sample at `index` with a read failure.
    pub fn fail_at(mut self, index: usize) -> Self {
        if let Some(slot) = self.script.get_mut(index) {
            *slot = Err(SensorError::ReadFailed {
                sensor: "scripted",
                operation: "read sample",
                details: "injected failure",
            });
        }
        self
    }

    /// Total number of reads served so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl SoundSource for ScriptedSource {
    async fn read(&mut self) -> Result<u16, SensorError> {
        if self.script.is_empty() {
            return Err(SensorError::NotReady { sensor: "scripted" });
        }

        let sample = self.script[self.position];
        self.position = (self.position + 1) % self.script.len();
        self.reads += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_replays_and_wraps() {
        let mut source = ScriptedSource::new(&[1, 2, 3]);
        let values: Vec<_> = (0..5).map(|_| block_on(source.read())).collect();
        assert_eq!(values, [Ok(1), Ok(2), Ok(3), Ok(1), Ok(2)]);
        assert_eq!(source.reads(), 5);
    }

    #[test]
    fn test_injected_failure() {
        let mut source = ScriptedSource::new(&[10, 20]).fail_at(1);
        assert_eq!(block_on(source.read()), Ok(10));
        assert!(matches!(
            block_on(source.read()),
            Err(SensorError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_empty_script_is_not_ready() {
        let mut source = ScriptedSource::new(&[]);
        assert_eq!(
            block_on(source.read()),
            Err(SensorError::NotReady { sensor: "scripted" })
        );
    }
}

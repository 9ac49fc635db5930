//! The two-phase sketch: calibrate once, then report forever

use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::calibration::{Baseline, Calibrator};
use crate::config::SketchConfig;
use crate::reading::Reading;
use crate::sensors::{SoundSource, read_or_floor};
use crate::sink::LineSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchState {
    Calibrating,
    Running,
}

/// A sketch that has not been calibrated yet.
///
/// Owns the microphone, the delay and the output sink. [`NoiseSketch::calibrate`]
/// consumes it and hands everything to a [`Reporter`], so the baseline can only
/// be computed once and no reading can be produced before it exists.
pub struct NoiseSketch<S, D, L> {
    config: SketchConfig,
    source: S,
    delay: D,
    sink: L,
}

impl<S, D, L> NoiseSketch<S, D, L>
where
    S: SoundSource,
    D: DelayNs,
    L: LineSink,
{
    pub fn new(config: SketchConfig, source: S, delay: D, sink: L) -> Self {
        Self {
            config,
            source,
            delay,
            sink,
        }
    }

    pub const fn state(&self) -> SketchState {
        SketchState::Calibrating
    }

    /// Run the calibration and move to the running phase.
    pub async fn calibrate(mut self) -> Reporter<S, D, L> {
        let baseline = Calibrator::new(self.config)
            .calibrate(&mut self.source, &mut self.delay)
            .await;

        info!(
            "Reporting every {} ms, loud above {}",
            self.config.report_interval_ms,
            baseline.threshold(self.config.threshold_offset)
        );

        Reporter {
            config: self.config,
            baseline,
            source: self.source,
            delay: self.delay,
            sink: self.sink,
        }
    }

    /// Calibrate, then report until power is removed.
    pub async fn run(self) -> ! {
        self.calibrate().await.run().await
    }
}

/// The running phase: one read, one classification, one line per iteration.
pub struct Reporter<S, D, L> {
    config: SketchConfig,
    baseline: Baseline,
    source: S,
    delay: D,
    sink: L,
}

impl<S, D, L> Reporter<S, D, L>
where
    S: SoundSource,
    D: DelayNs,
    L: LineSink,
{
    pub const fn state(&self) -> SketchState {
        SketchState::Running
    }

    pub const fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// One reporting iteration: read, decide, emit, sleep.
    ///
    /// Neither a failed read nor a failed write ends the iteration early; the
    /// pause always happens so the cadence is kept.
    pub async fn step(&mut self) -> Reading {
        let raw = read_or_floor(&mut self.source).await;
        let reading = Reading::classify(raw, self.baseline, self.config.threshold_offset);
        debug!("raw={} loud={}", reading.raw, reading.loud);

        if let Err(e) = self.sink.write_line(reading.to_line().as_str()).await {
            warn!("Dropped report: {}", e);
        }

        self.delay.delay_ms(self.config.report_interval_ms).await;
        reading
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::ScriptedSource;
    use crate::testing::{CaptureSink, Event, JournaledSource, Journal, RecordingDelay};
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use embassy_futures::block_on;

    type TestReporter = Reporter<JournaledSource, RecordingDelay, CaptureSink>;

    /// Calibrate against a constant floor, then switch the source to `script`.
    fn calibrated(floor: u16, script: &[u16], journal: &Journal) -> TestReporter {
        let mut calibration_then_script = alloc::vec![floor; 100];
        calibration_then_script.extend_from_slice(script);
        let source = JournaledSource::new(
            ScriptedSource::new(&calibration_then_script),
            journal.clone(),
        );
        let sketch = NoiseSketch::new(
            SketchConfig::DEFAULT,
            source,
            RecordingDelay::new(journal.clone()),
            CaptureSink::new(journal.clone()),
        );
        assert_eq!(sketch.state(), SketchState::Calibrating);
        block_on(sketch.calibrate())
    }

    #[test]
    fn test_no_output_during_calibration() {
        let journal = Journal::new();
        let reporter = calibrated(500, &[], &journal);
        assert_eq!(reporter.state(), SketchState::Running);
        assert_eq!(reporter.baseline().value(), 500);
        assert!(journal.lines().is_empty());
        assert_eq!(journal.events()[0], Event::Delay(1000));
    }

    #[test]
    fn test_reports_against_calibrated_baseline() {
        let journal = Journal::new();
        let mut reporter = calibrated(500, &[600, 540, 541, 0], &journal);

        let readings: Vec<Reading> = (0..4).map(|_| block_on(reporter.step())).collect();
        assert_eq!(
            readings.iter().map(|r| r.loud).collect::<Vec<_>>(),
            [true, false, true, false]
        );
        assert_eq!(
            journal.lines(),
            [
                r#"{"raw":600,"baseline":500,"loud":true}"#,
                r#"{"raw":540,"baseline":500,"loud":false}"#,
                r#"{"raw":541,"baseline":500,"loud":true}"#,
                r#"{"raw":0,"baseline":500,"loud":false}"#,
            ]
        );
    }

    #[test]
    fn test_baseline_never_changes() {
        let journal = Journal::new();
        let mut reporter = calibrated(321, &[0, 1023, 700, 12, 999], &journal);

        for _ in 0..250 {
            let reading = block_on(reporter.step());
            assert_eq!(reading.baseline, 321);
        }
        assert_eq!(reporter.baseline().value(), 321);
    }

    #[test]
    fn test_iteration_order_and_cadence() {
        let journal = Journal::new();
        let mut reporter = calibrated(400, &[410, 410, 410], &journal);
        let calibration_events = journal.events().len();

        for _ in 0..3 {
            block_on(reporter.step());
        }

        let line = r#"{"raw":410,"baseline":400,"loud":false}"#.to_string();
        let iteration = [Event::Read, Event::Line(line), Event::Delay(50)];
        let expected: Vec<Event> = iteration.iter().cloned().cycle().take(9).collect();
        assert_eq!(journal.events()[calibration_events..], expected[..]);
    }

    #[test]
    fn test_degraded_read_still_reports() {
        let journal = Journal::new();
        let mut calibration_then_script = alloc::vec![200u16; 100];
        calibration_then_script.push(900);
        let source = JournaledSource::new(
            ScriptedSource::new(&calibration_then_script).fail_at(100),
            journal.clone(),
        );
        let sketch = NoiseSketch::new(
            SketchConfig::DEFAULT,
            source,
            RecordingDelay::new(journal.clone()),
            CaptureSink::new(journal.clone()),
        );
        let mut reporter = block_on(sketch.calibrate());

        let reading = block_on(reporter.step());
        assert_eq!(reading.raw, 0);
        assert_eq!(
            journal.lines(),
            [r#"{"raw":0,"baseline":200,"loud":false}"#]
        );
    }

    #[test]
    fn test_sink_failure_keeps_cadence() {
        let journal = Journal::new();
        let sketch = NoiseSketch::new(
            SketchConfig::DEFAULT,
            JournaledSource::new(ScriptedSource::constant(100), journal.clone()),
            RecordingDelay::new(journal.clone()),
            CaptureSink::failing(journal.clone()),
        );
        let mut reporter = block_on(sketch.calibrate());
        let before = journal.events().len();

        let reading = block_on(reporter.step());
        assert_eq!(reading.raw, 100);
        assert_eq!(
            journal.events()[before..],
            [Event::Read, Event::Delay(50)]
        );
    }

    #[test]
    fn test_custom_config_is_honoured() {
        let journal = Journal::new();
        let config = SketchConfig {
            threshold_offset: 5,
            report_interval_ms: 7,
            ..SketchConfig::DEFAULT
        };
        let sketch = NoiseSketch::new(
            config,
            JournaledSource::new(ScriptedSource::constant(106), journal.clone()),
            RecordingDelay::new(journal.clone()),
            CaptureSink::new(journal.clone()),
        );
        let mut reporter = block_on(sketch.calibrate());
        // Baseline is 106 too, so 106 is not above 111.
        assert!(!block_on(reporter.step()).loud);
        assert_eq!(journal.events().last(), Some(&Event::Delay(7)));
    }
}

//! Desktop simulator and serial collector for the noisefloor sound level sensor.
//!
//! `simulate` (the default) runs the same calibrate-then-report sketch as the
//! firmware against a synthetic microphone. Report lines go to stdout exactly
//! as they would go over the serial link, and are also fed to an in-process
//! collector that logs spikes and per-window statistics.
//!
//! `collect` runs that collector against a real device, reading the report
//! stream from a serial port (or stdin).
//!
//! ```text
//! RUST_LOG=info cargo run -p noisefloor-simulator
//! RUST_LOG=info SERIAL_PORT=/dev/ttyUSB0 cargo run -p noisefloor-simulator -- collect
//! ```

mod collector;
mod stream;
mod synthetic;

use std::io::{BufReader, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use noisefloor_core::config::{MonitorConfig, SketchConfig};
use noisefloor_core::sink::{LineSink, SinkError};
use noisefloor_core::sketch::NoiseSketch;

use collector::Collector;
use synthetic::{StdDelay, SyntheticMicrophone};

/// Resting level of the synthetic microphone.
const QUIET_FLOOR: u16 = 330;

/// Level a synthetic burst starts at.
const BURST_PEAK: u16 = 800;

/// Longest wait for serial data before the collector ticks anyway.
const SERIAL_READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(
    name = "noisefloor-simulator",
    about = "Simulate the noisefloor sensor or analyse a real one's report stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the sketch against a synthetic microphone
    Simulate,
    /// Analyse the report lines of a real device
    Collect {
        /// Serial port the device is attached to
        #[arg(long, env = "SERIAL_PORT", default_value = "COM5")]
        port: String,
        #[arg(long, env = "BAUD_RATE", default_value_t = 9600)]
        baud_rate: u32,
        /// Read report lines from stdin instead of the serial port
        #[arg(long)]
        stdin: bool,
    },
}

/// Writes each report to `out` and hands it to the collector.
struct ConsoleSink<W> {
    out: W,
    collector: Collector,
    started: Instant,
}

impl<W: Write> ConsoleSink<W> {
    fn new(out: W, collector: Collector) -> Self {
        Self {
            out,
            collector,
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl<W: Write> LineSink for ConsoleSink<W> {
    async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.out, "{line}").map_err(|e| {
            error!("console write failed: {}", e);
            SinkError::WriteFailed
        })?;
        self.out.flush().map_err(|e| {
            error!("console flush failed: {}", e);
            SinkError::FlushFailed
        })?;

        let now_ms = self.elapsed_ms();
        self.collector.ingest_line(now_ms, line);
        self.collector.tick(now_ms);
        Ok(())
    }
}

fn simulate() -> ! {
    let config = SketchConfig::DEFAULT;
    info!(
        "Microphone on {} (synthetic, floor {}), {} baud, startup takes {} ms",
        config.channel_label(),
        QUIET_FLOOR,
        config.baud_rate,
        config.startup_latency_ms()
    );

    let sink = ConsoleSink::new(std::io::stdout(), Collector::new(MonitorConfig::DEFAULT, 0));
    let sketch = NoiseSketch::new(
        config,
        SyntheticMicrophone::new(QUIET_FLOOR, BURST_PEAK),
        StdDelay,
        sink,
    );

    embassy_futures::block_on(sketch.run())
}

fn collect(port: &str, baud_rate: u32, from_stdin: bool) -> Result<()> {
    let started = Instant::now();
    let clock = move || started.elapsed().as_millis() as u64;
    let mut collector = Collector::new(MonitorConfig::DEFAULT, 0);

    if from_stdin {
        info!("Reading report lines from stdin");
        stream::drain(std::io::stdin().lock(), &mut collector, clock)
            .context("reading stdin")?;
    } else {
        info!("Connecting to serial port {} at {} baud", port, baud_rate);
        let serial = serialport::new(port, baud_rate)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()
            .with_context(|| format!("opening serial port {port}"))?;
        info!("Serial port opened");
        stream::drain(BufReader::new(serial), &mut collector, clock)
            .with_context(|| format!("reading serial port {port}"))?;
    }

    let stats = collector.stats();
    info!(
        "{} samples, {} rejected lines, {} spikes, {} windows",
        stats.samples, stats.rejected, stats.spikes, stats.windows
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Simulate) {
        Commands::Simulate => {
            info!("Starting noisefloor simulator");
            simulate()
        }
        Commands::Collect {
            port,
            baud_rate,
            stdin,
        } => match collect(&port, baud_rate, stdin) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{err:?}");
                ExitCode::from(1)
            }
        },
    }
}

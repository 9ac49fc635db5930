//! Feeding a [`Collector`] from a line-oriented byte stream
//!
//! A serial port opened with a read timeout returns `TimedOut` whenever the
//! device is quiet. Each wake-up, whether a line arrived or not, ticks the
//! collector, so windows close on time even after the stream stops.

use std::io::{self, BufRead, ErrorKind};

use log::info;

use crate::collector::Collector;

/// Read lines until end of stream, ingesting each one and ticking the
/// collector after every read attempt.
///
/// `now_ms` supplies the current time. A partial line interrupted by a timeout
/// is kept and completed by the next read.
pub fn drain<R, C>(mut reader: R, collector: &mut Collector, mut now_ms: C) -> io::Result<()>
where
    R: BufRead,
    C: FnMut() -> u64,
{
    let mut line = String::new();

    loop {
        match reader.read_line(&mut line) {
            Ok(0) => {
                collector.tick(now_ms());
                info!("Report stream closed");
                return Ok(());
            }
            Ok(_) => {
                collector.ingest_line(now_ms(), &line);
                line.clear();
            }
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }

        collector.tick(now_ms());
    }
}

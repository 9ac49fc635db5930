//! Line-oriented output transport

use embedded_io_async::{Error as _, Write};
use log::error;
use thiserror_no_std::Error;

/// Line terminator written after every report, matching the Arduino `println`.
pub const LINE_TERMINATOR: &str = "\r\n";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    #[error("Failed to write report line")]
    WriteFailed,
    #[error("Failed to flush report line")]
    FlushFailed,
}

/// Destination for report lines. `line` never carries the terminator.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> impl Future<Output = Result<(), SinkError>>;
}

impl<T: LineSink + ?Sized> LineSink for &mut T {
    fn write_line(&mut self, line: &str) -> impl Future<Output = Result<(), SinkError>> {
        T::write_line(self, line)
    }
}

/// [`LineSink`] over any byte-oriented writer such as a UART transmitter.
///
/// The serial link is write-only; nothing is ever read back.
pub struct SerialSink<W> {
    writer: W,
}

impl<W: Write> SerialSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<(), SinkError> {
        while !bytes.is_empty() {
            let written = self.writer.write(bytes).await.map_err(|e| {
                error!("Serial write failed: {:?}", e.kind());
                SinkError::WriteFailed
            })?;
            if written == 0 {
                error!("Serial writer accepted no bytes");
                return Err(SinkError::WriteFailed);
            }
            bytes = &bytes[written..];
        }
        Ok(())
    }
}

impl<W: Write> LineSink for SerialSink<W> {
    async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.write_bytes(line.as_bytes()).await?;
        self.write_bytes(LINE_TERMINATOR.as_bytes()).await?;
        self.writer.flush().await.map_err(|e| {
            error!("Serial flush failed: {:?}", e.kind());
            SinkError::FlushFailed
        })
    }
}

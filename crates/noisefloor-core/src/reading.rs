//! One classified sample and its wire representation

use core::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::calibration::Baseline;

/// Capacity of a rendered report line.
///
/// The longest line, `{"raw":65535,"baseline":65535,"loud":false}`, is 43 bytes.
pub const LINE_CAPACITY: usize = 48;

/// A single report: the raw sample, the baseline it was judged against and
/// whether it counts as loud.
///
/// Field order is part of the wire format and must stay `raw`, `baseline`, `loud`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub raw: u16,
    pub baseline: u16,
    pub loud: bool,
}

impl Reading {
    /// Classify `raw` against `baseline + offset`.
    ///
    /// The comparison is strict: a sample sitting exactly on the threshold is
    /// not loud.
    pub fn classify(raw: u16, baseline: Baseline, offset: u16) -> Self {
        Self {
            raw,
            baseline: baseline.value(),
            loud: u32::from(raw) > baseline.threshold(offset),
        }
    }

    /// Render the reading into a fixed-capacity line without a terminator.
    pub fn to_line(&self) -> heapless::String<LINE_CAPACITY> {
        let mut line = heapless::String::new();
        // LINE_CAPACITY covers the widest possible rendering.
        let _ = write!(line, "{self}");
        line
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"raw\":{},\"baseline\":{},\"loud\":{}}}",
            self.raw, self.baseline, self.loud
        )
    }
}

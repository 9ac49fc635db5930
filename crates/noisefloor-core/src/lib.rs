//! Hardware-independent core library for noisefloor
//!
//! This crate contains all platform-agnostic logic for the noisefloor sound
//! level sensor: noise-floor calibration, loudness classification, the
//! fixed-format JSON report, the capability traits the firmware and the
//! simulator plug their hardware into, and the host-side window monitor.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod calibration;
pub mod config;
pub mod monitor;
pub mod reading;
pub mod sensors;
pub mod sink;
pub mod sketch;

#[cfg(test)]
pub(crate) mod testing;

//! ESP32-S3 firmware-specific modules for noisefloor
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: the ADC-backed microphone input.

#![no_std]

pub mod microphone;

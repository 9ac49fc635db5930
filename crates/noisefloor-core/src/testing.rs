//! Shared test doubles recording into one ordered journal

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_hal_async::delay::DelayNs;

use crate::sensors::{ScriptedSource, SensorError, SoundSource};
use crate::sink::{LineSink, SinkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Read,
    Delay(u32),
    Line(String),
}

#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Line(line) => Some(line),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct RecordingDelay {
    journal: Journal,
}

impl RecordingDelay {
    pub(crate) fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.journal.push(Event::Delay(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.journal.push(Event::Delay(ms));
    }
}

pub(crate) struct JournaledSource {
    inner: ScriptedSource,
    journal: Journal,
}

impl JournaledSource {
    pub(crate) fn new(inner: ScriptedSource, journal: Journal) -> Self {
        Self { inner, journal }
    }
}

impl SoundSource for JournaledSource {
    async fn read(&mut self) -> Result<u16, SensorError> {
        self.journal.push(Event::Read);
        self.inner.read().await
    }
}

pub(crate) struct CaptureSink {
    journal: Journal,
    failing: bool,
}

impl CaptureSink {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            journal,
            failing: false,
        }
    }

    pub(crate) fn failing(journal: Journal) -> Self {
        Self {
            journal,
            failing: true,
        }
    }
}

impl LineSink for CaptureSink {
    async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        if self.failing {
            return Err(SinkError::WriteFailed);
        }
        self.journal.push(Event::Line(line.to_string()));
        Ok(())
    }
}

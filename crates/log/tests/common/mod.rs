//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use logf::{CallId, EventKind, LogEvent, Sink};
use parking_lot::Mutex;

/// Sink that keeps every event it receives
#[derive(Default)]
pub struct Capture {
    events: Mutex<Vec<LogEvent>>,
}

impl Sink for Capture {
    fn emit(&self, event: &LogEvent) {
        self.events.lock().push(event.clone());
    }
}

impl Capture {
    /// Register a fresh capture under `logger`
    ///
    /// Every test uses its own logger name, so tests can run in parallel.
    pub fn install(logger: &str) -> Arc<Self> {
        let capture = Arc::new(Self::default());
        logf::sink::register_sink(logger, Arc::clone(&capture));
        capture
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.text.clone()).collect()
    }

    pub fn ids(&self) -> Vec<Option<CallId>> {
        self.events.lock().iter().map(|e| e.call_id.clone()).collect()
    }
}

/// Shared in-memory writer for [`logf::LineSink`]
#[derive(Clone, Default)]
pub struct Lines(Arc<Mutex<Vec<u8>>>);

impl Lines {
    /// Register a [`logf::LineSink`] writing here under `logger`
    pub fn install(logger: &str) -> Self {
        let lines = Self::default();
        let writer = lines.clone();
        logf::sink::register_sink(logger, logf::LineSink::new(move || writer.clone()));
        lines
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(String::from)
            .collect()
    }
}

impl io::Write for Lines {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that drops everything
pub struct Discard;

impl Sink for Discard {
    fn emit(&self, _event: &LogEvent) {}
}

/// Elapsed seconds printed in a line (`name() 0.01234s | ...`)
pub fn elapsed_secs(text: &str) -> Option<f64> {
    text.split(' ')
        .filter_map(|token| token.strip_suffix('s'))
        .find_map(|number| number.parse::<f64>().ok())
}

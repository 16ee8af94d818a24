//! Plain line sinks

use std::fmt;
use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use super::Sink;
use crate::message::LogEvent;

/// Writes one line per event to standard output
///
/// Severity and stack capture are ignored; the line is the event text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn emit(&self, event: &LogEvent) {
        write_line(&mut io::stdout().lock(), event);
    }
}

/// Writes one line per event to any [`MakeWriter`]
///
/// Same output as [`StdoutSink`], for files, buffers or a
/// `tracing_subscriber` writer.
pub struct LineSink<M> {
    make_writer: M,
}

impl<M> LineSink<M> {
    /// Sink writing through `make_writer`
    pub const fn new(make_writer: M) -> Self {
        Self { make_writer }
    }
}

impl<M> fmt::Debug for LineSink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSink").finish_non_exhaustive()
    }
}

impl<M> Sink for LineSink<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn emit(&self, event: &LogEvent) {
        write_line(&mut self.make_writer.make_writer(), event);
    }
}

fn write_line(out: &mut impl Write, event: &LogEvent) {
    // Sink failures belong to the collaborator.
    let _ = writeln!(out, "{}", event.text);
}

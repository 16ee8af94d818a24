//! `tracing` sink

use std::backtrace::Backtrace;

use super::Sink;
use crate::config::Level;
use crate::message::LogEvent;

/// Target of every event emitted by [`TracingSink`]
pub const TARGET: &str = "logf";

/// Process-default sink: one `tracing` event per [`LogEvent`]
///
/// Fields: `function`, `call_id`, `event`, `severity`, `logger` and, when
/// stack capture is requested, `stack`. The message is the event text.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    logger: Option<Box<str>>,
}

impl TracingSink {
    /// Sink without a logger tag
    pub const fn new() -> Self {
        Self { logger: None }
    }

    /// Sink tagging every event with a logger name
    pub fn named(logger: impl Into<Box<str>>) -> Self {
        Self {
            logger: Some(logger.into()),
        }
    }

    /// Logger tag, if any
    pub fn logger(&self) -> Option<&str> {
        self.logger.as_deref()
    }
}

macro_rules! dispatch {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            Level::Debug => ::tracing::debug!(target: TARGET, $($fields)*),
            Level::Info => ::tracing::info!(target: TARGET, $($fields)*),
            Level::Warning => ::tracing::warn!(target: TARGET, $($fields)*),
            Level::Error | Level::Critical => ::tracing::error!(target: TARGET, $($fields)*),
        }
    };
}

impl Sink for TracingSink {
    fn emit(&self, event: &LogEvent) {
        let function = &*event.function;
        let call_id = event.call_id.as_ref().map(|id| id.as_str());
        let kind = event.kind.as_str();
        let severity = event.level.as_str();
        let logger = self.logger.as_deref();
        let text = event.text.as_str();

        if event.stack_info {
            let stack = Backtrace::force_capture();
            dispatch!(
                event.level,
                function,
                call_id,
                event = kind,
                severity,
                logger,
                stack = %stack,
                "{text}"
            );
        } else {
            dispatch!(
                event.level,
                function,
                call_id,
                event = kind,
                severity,
                logger,
                "{text}"
            );
        }
    }
}

//! Event delivery
//!
//! A [`Sink`] receives finished [`LogEvent`]s. The wrapper never picks a
//! backend itself; it asks a [`SinkSelector`] for one per event, which
//! keeps `use_logger` names late-bound.

mod registry;
mod stdout;
mod tracing;

use std::sync::Arc;

pub use self::registry::{GlobalSelector, register_sink, set_default_sink, unregister_sink};
pub use self::stdout::{LineSink, StdoutSink};
pub use self::tracing::TracingSink;

use crate::config::Config;
use crate::message::LogEvent;

/// Destination for formatted events
pub trait Sink: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: &LogEvent);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn emit(&self, event: &LogEvent) {
        (**self).emit(event);
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&self, event: &LogEvent) {
        (**self).emit(event);
    }
}

/// Picks the sink for a configuration
pub trait SinkSelector: Send + Sync {
    /// Sink for events produced under `config`
    fn select(&self, config: &Config) -> Arc<dyn Sink>;
}

/// Selector that always returns the same sink, ignoring routing options
#[derive(Clone)]
pub struct FixedSelector(pub Arc<dyn Sink>);

impl FixedSelector {
    /// Wrap a sink
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self(Arc::new(sink))
    }
}

impl std::fmt::Debug for FixedSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedSelector").finish_non_exhaustive()
    }
}

impl SinkSelector for FixedSelector {
    fn select(&self, _config: &Config) -> Arc<dyn Sink> {
        Arc::clone(&self.0)
    }
}

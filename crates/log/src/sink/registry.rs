//! Process-wide named sink registry
//!
//! `use_logger = "name"` is resolved here at emission time, so a sink
//! registered after a function was first called still receives its events.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::{Sink, SinkSelector, StdoutSink, TracingSink};
use crate::config::Config;

struct SinkRegistry {
    named: HashMap<Box<str>, Arc<dyn Sink>>,
    default: Option<Arc<dyn Sink>>,
}

static REGISTRY: LazyLock<RwLock<SinkRegistry>> = LazyLock::new(|| {
    RwLock::new(SinkRegistry {
        named: HashMap::new(),
        default: None,
    })
});

/// Register `sink` under `name`, replacing any previous one
///
/// # Example
///
/// ```rust
/// use logf::sink::{Sink, register_sink, unregister_sink};
/// use logf::LogEvent;
///
/// struct Quiet;
///
/// impl Sink for Quiet {
///     fn emit(&self, _event: &LogEvent) {}
/// }
///
/// register_sink("quiet", Quiet);
/// assert!(unregister_sink("quiet"));
/// ```
pub fn register_sink(name: impl Into<Box<str>>, sink: impl Sink + 'static) {
    let name = name.into();
    ::tracing::trace!(target: "logf", logger = %name, "sink registered");
    REGISTRY.write().named.insert(name, Arc::new(sink));
}

/// Remove the sink registered under `name`; returns whether one existed
pub fn unregister_sink(name: &str) -> bool {
    REGISTRY.write().named.remove(name).is_some()
}

/// Replace the sink used when no logger name is configured
///
/// `None` restores [`TracingSink`].
pub fn set_default_sink(sink: Option<Arc<dyn Sink>>) {
    REGISTRY.write().default = sink;
}

/// Selector backed by the global registry
///
/// Routing: `use_print` wins and selects [`StdoutSink`]; otherwise a
/// configured logger name selects the registered sink, or a
/// [`TracingSink`] tagged with that name; otherwise the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalSelector;

impl SinkSelector for GlobalSelector {
    fn select(&self, config: &Config) -> Arc<dyn Sink> {
        if config.use_print {
            return Arc::new(StdoutSink);
        }

        let registry = REGISTRY.read();
        match config.use_logger.as_deref() {
            Some(name) => match registry.named.get(name) {
                Some(sink) => Arc::clone(sink),
                None => Arc::new(TracingSink::named(name)),
            },
            None => match &registry.default {
                Some(sink) => Arc::clone(sink),
                None => Arc::new(TracingSink::new()),
            },
        }
    }
}

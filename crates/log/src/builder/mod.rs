//! Global subscriber bootstrap
//!
//! - `settings`: [`SubscriberConfig`] and its presets
//! - `format`: fmt layer construction shared by every format

#[macro_use]
mod format;
mod settings;

pub use settings::{
    DEFAULT_FILTER, DisplayConfig, Format, LOGF_FILTER, LOGF_FORMAT, SubscriberConfig, Writer,
};

use std::io;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::{LogError, LogResult};

/// Installs a global subscriber from a [`SubscriberConfig`]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: SubscriberConfig,
}

/// Returned by [`LoggerBuilder::build`]
///
/// The subscriber stays installed for the rest of the process; the guard
/// only records whether this call installed it.
#[derive(Debug)]
pub struct LoggerGuard {
    installed: bool,
}

impl LoggerGuard {
    /// Guard for a subscriber installed elsewhere
    pub(crate) const fn noop() -> Self {
        Self { installed: false }
    }

    /// Whether this guard's builder installed the global subscriber
    pub const fn installed(&self) -> bool {
        self.installed
    }
}

macro_rules! init_subscriber {
    ($filter:expr, $fmt_layer:expr) => {
        Registry::default()
            .with($filter)
            .with($fmt_layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?
    };
}

impl LoggerBuilder {
    /// Builder for `config`
    #[must_use]
    pub fn from_config(config: SubscriberConfig) -> Self {
        Self { config }
    }

    /// Parse the filter and install the global subscriber
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] if the filter directive does not parse
    /// - [`LogError::Init`] if a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.filter)
            .map_err(|e| LogError::filter(&self.config.filter, e))?;

        let writer = match self.config.writer {
            Writer::Stderr => BoxMakeWriter::new(io::stderr),
            Writer::Stdout => BoxMakeWriter::new(io::stdout),
        };

        let display = &self.config.display;
        match self.config.format {
            Format::Compact => {
                init_subscriber!(filter, create_fmt_layer!(compact, display, writer));
            }
            Format::Pretty => {
                init_subscriber!(filter, create_fmt_layer!(pretty, display, writer));
            }
            Format::Json => {
                init_subscriber!(filter, create_json_layer!(display, writer));
            }
        }

        Ok(LoggerGuard { installed: true })
    }
}

/// Install a subscriber chosen from the environment
///
/// `LOGF_FILTER` or `RUST_LOG` set: [`SubscriberConfig::from_env`];
/// otherwise the development preset in debug builds and the production
/// preset in release builds. Returns a no-op guard when a subscriber is
/// already installed.
///
/// # Errors
///
/// Returns [`LogError::Filter`] if the configured filter does not parse.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }

    let from_env = std::env::var_os(LOGF_FILTER).is_some() || std::env::var_os("RUST_LOG").is_some();
    let config = if from_env {
        SubscriberConfig::from_env()
    } else if cfg!(debug_assertions) {
        SubscriberConfig::development()
    } else {
        SubscriberConfig::production()
    };
    init_with(config)
}

/// Install a subscriber with default settings
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init() -> LogResult<LoggerGuard> {
    init_with(SubscriberConfig::default())
}

/// Install a subscriber with `config`
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init_with(config: SubscriberConfig) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

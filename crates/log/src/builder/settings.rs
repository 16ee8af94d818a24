//! Subscriber settings and presets

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::LogError;

/// Environment variable holding the filter directive
pub const LOGF_FILTER: &str = "LOGF_FILTER";
/// Environment variable selecting the output format
pub const LOGF_FORMAT: &str = "LOGF_FORMAT";

/// Filter used when none is configured: `info` overall, and every level for
/// instrumented calls, which log at `DEBUG` unless told otherwise
pub const DEFAULT_FILTER: &str = "info,logf=debug";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Single-line human readable
    #[default]
    Compact,
    /// Multi-line human readable
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for Format {
    type Err = LogError;

    /// Case-insensitive format name
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(LogError::Config(format!(
                "unknown format '{raw}', expected compact, pretty or json"
            ))),
        }
    }
}

/// Output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Writer {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

/// Display toggles shared by every format
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the event target
    pub target: bool,
    /// Show `file:line`
    pub source: bool,
    /// Show thread ids
    pub thread_ids: bool,
    /// Show thread names
    pub thread_names: bool,
    /// ANSI colors (ignored for JSON)
    pub colors: bool,
    /// Include the span list in JSON
    pub span_list: bool,
    /// Flatten event fields into the JSON root
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target: true,
            source: false,
            thread_ids: false,
            thread_names: false,
            colors: cfg!(feature = "ansi") && std::io::IsTerminal::is_terminal(&std::io::stderr()),
            span_list: true,
            flatten: true,
        }
    }
}

/// Settings of the global `tracing` subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// `EnvFilter` directive, e.g. `info,logf=debug`
    pub filter: String,
    /// Output format
    pub format: Format,
    /// Output stream
    pub writer: Writer,
    /// Display toggles
    pub display: DisplayConfig,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: Format::default(),
            writer: Writer::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl SubscriberConfig {
    /// Defaults overridden by `LOGF_FILTER` (or `RUST_LOG`) and `LOGF_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = var(LOGF_FILTER).or_else(|| var("RUST_LOG")) {
            config.filter = filter;
        }
        if let Some(raw) = var(LOGF_FORMAT) {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::debug!(target: "logf", error = %e, "ignoring {LOGF_FORMAT}"),
            }
        }

        config
    }

    /// Pretty output at debug level with source locations
    #[must_use]
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Flattened JSON with the default filter, no colors
    #[must_use]
    pub fn production() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}

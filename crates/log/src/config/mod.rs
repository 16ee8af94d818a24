//! Configuration for instrumented calls
//!
//! Every instrumented function owns one immutable [`Config`], produced by
//! layering three sources, highest precedence first:
//!
//! 1. [`Options`] given explicitly when the function is decorated
//! 2. `LOGF_*` environment variables, read once into an [`EnvSnapshot`]
//! 3. built-in defaults
//!
//! Malformed environment values never fail resolution; they fall through to
//! the default for that field.

mod env;
mod level;

pub use env::{
    ENV_VARS, EnvSnapshot, LOGF_IDENTIFIER, LOGF_LEVEL, LOGF_LOG_ARGS, LOGF_LOG_EXCEPTION,
    LOGF_LOG_EXEC_TIME, LOGF_LOG_RETURN, LOGF_MAX_STR_LEN, LOGF_SINGLE_EXCEPTION,
    LOGF_SINGLE_MSG, LOGF_STACK_INFO, LOGF_USE_LOGGER, LOGF_USE_PRINT, parse_bool,
    parse_max_str_len,
};
pub use level::{Level, ParseLevelError};

use serde::{Deserialize, Serialize};

/// Truncation limit used when neither an option nor the environment sets one
pub const DEFAULT_MAX_STR_LEN: usize = 1000;

/// Resolved settings of one instrumented function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Severity of enter/exit events
    pub level: Level,
    /// Render the argument snapshot
    pub log_args: bool,
    /// Render the return value
    pub log_return: bool,
    /// Character limit for every rendered fragment, `None` for unlimited
    pub max_str_len: Option<usize>,
    /// Report elapsed wall-clock time
    pub log_exec_time: bool,
    /// Fold enter and exit into one event
    pub single_msg: bool,
    /// Write lines to stdout instead of a sink
    pub use_print: bool,
    /// Ask the sink to capture a stack trace
    pub log_stack_info: bool,
    /// Name of the sink to route events to
    pub use_logger: Option<String>,
    /// Tag each call with a correlation identifier
    pub identifier: bool,
    /// Report raised errors
    pub log_exception: bool,
    /// Merge exit accounting and the error report into one event
    pub single_exception: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            log_args: true,
            log_return: true,
            max_str_len: Some(DEFAULT_MAX_STR_LEN),
            log_exec_time: true,
            single_msg: false,
            use_print: false,
            log_stack_info: false,
            use_logger: None,
            identifier: true,
            log_exception: true,
            single_exception: false,
        }
    }
}

impl Config {
    /// Resolve defaults against the current process environment
    pub fn from_env() -> Self {
        Options::new().resolve(&EnvSnapshot::capture())
    }

    /// Whether a raised error is reported in the same event as the exit
    ///
    /// Only single-message mode merges; `single_exception` only takes
    /// effect when errors are reported at all.
    pub fn merges_exception(&self) -> bool {
        self.single_msg && self.log_exception && self.single_exception
    }
}

/// Explicit decoration-time settings; `None` defers to the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Severity of enter/exit events
    pub level: Option<Level>,
    /// Render the argument snapshot
    pub log_args: Option<bool>,
    /// Render the return value
    pub log_return: Option<bool>,
    /// `Some(None)` explicitly requests unlimited rendering
    pub max_str_len: Option<Option<usize>>,
    /// Report elapsed time
    pub log_exec_time: Option<bool>,
    /// Fold enter and exit into one event
    pub single_msg: Option<bool>,
    /// Write lines to stdout
    pub use_print: Option<bool>,
    /// Request stack capture
    pub log_stack_info: Option<bool>,
    /// Named sink
    pub use_logger: Option<String>,
    /// Correlation identifier
    pub identifier: Option<bool>,
    /// Report raised errors
    pub log_exception: Option<bool>,
    /// Merge exit accounting and the error report
    pub single_exception: Option<bool>,
}

impl Options {
    /// Options with every field deferred
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the severity
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Toggle argument rendering
    pub fn log_args(mut self, enabled: bool) -> Self {
        self.log_args = Some(enabled);
        self
    }

    /// Toggle return value rendering
    pub fn log_return(mut self, enabled: bool) -> Self {
        self.log_return = Some(enabled);
        self
    }

    /// Limit rendered fragments; `None` renders them in full
    pub fn max_str_len(mut self, limit: Option<usize>) -> Self {
        self.max_str_len = Some(limit);
        self
    }

    /// Toggle elapsed time reporting
    pub fn log_exec_time(mut self, enabled: bool) -> Self {
        self.log_exec_time = Some(enabled);
        self
    }

    /// Alias of [`Options::log_exec_time`] kept for older call sites
    pub fn measure_time(self, enabled: bool) -> Self {
        self.log_exec_time(enabled)
    }

    /// Toggle single-message mode
    pub fn single_msg(mut self, enabled: bool) -> Self {
        self.single_msg = Some(enabled);
        self
    }

    /// Toggle stdout routing
    pub fn use_print(mut self, enabled: bool) -> Self {
        self.use_print = Some(enabled);
        self
    }

    /// Toggle stack capture
    pub fn log_stack_info(mut self, enabled: bool) -> Self {
        self.log_stack_info = Some(enabled);
        self
    }

    /// Route events to a named sink
    pub fn use_logger(mut self, name: impl Into<String>) -> Self {
        self.use_logger = Some(name.into());
        self
    }

    /// Toggle correlation identifiers
    pub fn identifier(mut self, enabled: bool) -> Self {
        self.identifier = Some(enabled);
        self
    }

    /// Toggle error reporting
    pub fn log_exception(mut self, enabled: bool) -> Self {
        self.log_exception = Some(enabled);
        self
    }

    /// Toggle the merged error event
    pub fn single_exception(mut self, enabled: bool) -> Self {
        self.single_exception = Some(enabled);
        self
    }

    /// Merge with the environment snapshot and the defaults.
    ///
    /// Pure: the same options and snapshot always produce the same config.
    pub fn resolve(self, env: &EnvSnapshot) -> Config {
        let defaults = Config::default();

        Config {
            level: self.level.or_else(|| env.level()).unwrap_or(defaults.level),
            log_args: self
                .log_args
                .or_else(|| env.flag(LOGF_LOG_ARGS))
                .unwrap_or(defaults.log_args),
            log_return: self
                .log_return
                .or_else(|| env.flag(LOGF_LOG_RETURN))
                .unwrap_or(defaults.log_return),
            max_str_len: self
                .max_str_len
                .or_else(|| env.max_str_len())
                .unwrap_or(defaults.max_str_len),
            log_exec_time: self
                .log_exec_time
                .or_else(|| env.flag(LOGF_LOG_EXEC_TIME))
                .unwrap_or(defaults.log_exec_time),
            single_msg: self
                .single_msg
                .or_else(|| env.flag(LOGF_SINGLE_MSG))
                .unwrap_or(defaults.single_msg),
            use_print: self
                .use_print
                .or_else(|| env.flag(LOGF_USE_PRINT))
                .unwrap_or(defaults.use_print),
            log_stack_info: self
                .log_stack_info
                .or_else(|| env.flag(LOGF_STACK_INFO))
                .unwrap_or(defaults.log_stack_info),
            use_logger: self.use_logger.or_else(|| env.logger()),
            identifier: self
                .identifier
                .or_else(|| env.flag(LOGF_IDENTIFIER))
                .unwrap_or(defaults.identifier),
            log_exception: self
                .log_exception
                .or_else(|| env.flag(LOGF_LOG_EXCEPTION))
                .unwrap_or(defaults.log_exception),
            single_exception: self
                .single_exception
                .or_else(|| env.flag(LOGF_SINGLE_EXCEPTION))
                .unwrap_or(defaults.single_exception),
        }
    }
}

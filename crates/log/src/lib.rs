//! # logf - leave-and-forget call logging
//!
//! Instruments functions, blocking or `async`, so every invocation reports
//! its arguments, its return value or error, and how long it took, without
//! changing what the function does.
//!
//! ## Quick Start
//!
//! ```rust
//! use logf::logf;
//!
//! #[logf(level = "INFO", max_str_len = 40)]
//! fn my_function(a: &str, b: &str) -> String {
//!     format!("{a}{b}c")
//! }
//!
//! fn main() -> logf::LogResult<()> {
//!     let _guard = logf::auto_init()?;
//!     assert_eq!(my_function("a", "b"), "abc");
//!     Ok(())
//! }
//! ```
//!
//! Each call emits lines like:
//!
//! ```text
//! my_function()[aB3_x9] | ("a", "b") {}
//! my_function()[aB3_x9] 0.00002s | abc
//! ```
//!
//! ## Configuration
//!
//! Options given in the attribute win over `LOGF_*` environment variables,
//! which win over defaults. See [`Options`] and [`config`].
//!
//! ## Without the macro
//!
//! [`Logf`] is the same engine as a value: build one per function and route
//! calls through [`Logf::call`] or [`Logf::instrument`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
pub mod config;
mod core;
mod ident;
mod message;
mod render;
pub mod sink;
mod wrapper;

// Public API
pub use builder::{
    DEFAULT_FILTER, DisplayConfig, Format, LOGF_FILTER, LOGF_FORMAT, LoggerBuilder, LoggerGuard,
    SubscriberConfig, Writer, auto_init, init, init_with,
};
pub use config::{Config, EnvSnapshot, Level, Options};
pub use self::core::{LogError, LogResult};
pub use ident::{CallId, ID_CHARS, ID_LEN};
pub use message::{
    CallRecord, EventKind, LogEvent, Outcome, Phase, Raised, enter_event, exit_events,
    format_elapsed, short_type_name,
};
pub use render::{Args, UNREPR, render_debug, render_display, render_value, truncate};
pub use sink::{GlobalSelector, LineSink, Sink, SinkSelector, StdoutSink, TracingSink};
pub use wrapper::{Dispatch, Fallible, Instrumented, Logf, Opaque, Plain, Report, ReportFn};

#[cfg(feature = "macros")]
pub use logf_macros::logf;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Args, Config, Dispatch, Level, LogEvent, Logf, Options, Sink, args, auto_init, init,
        init_with,
    };

    #[cfg(feature = "macros")]
    pub use crate::logf;
}

/// Items used by macro expansions; not a stable API.
#[doc(hidden)]
pub mod __private {
    pub use crate::render::ladder::*;
}

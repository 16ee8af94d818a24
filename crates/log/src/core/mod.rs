//! Core types shared across the crate.
//!
//! ### [`error`] - Error handling
//! Errors raised while bootstrapping the logging backend. The instrumentation
//! path itself never fails on its own account: malformed overrides degrade to
//! defaults and rendering failures turn into a placeholder.

pub mod error;

pub use error::{LogError, LogResult};

//! Internal support utilities for the attribute macro.
//!
//! Attribute argument parsing, diagnostics and return type inspection.

pub mod attrs;
pub mod diag;
pub mod utils;

//! # logf-macros
//!
//! The `#[logf]` attribute. Use it through the `logf` crate, which
//! re-exports it and provides the runtime the expansion calls into.
//!
//! ## Options
//!
//! | Key | Form | Effect |
//! |-----|------|--------|
//! | `level` | `"INFO"`, `INFO` or `20` | severity of normal events |
//! | `log_args` | flag or `= bool` | log the argument snapshot |
//! | `log_return` | flag or `= bool` | log the returned value |
//! | `max_str_len` | `= N` or `= None` | truncate rendered text to `N` chars |
//! | `log_exec_time` / `measure_time` | flag or `= bool` | log elapsed seconds |
//! | `single_msg` | flag or `= bool` | one event per call instead of two |
//! | `use_print` | flag or `= bool` | write lines to stdout |
//! | `log_stack_info` | flag or `= bool` | attach a backtrace |
//! | `use_logger` | `= "name"` | route to a named sink |
//! | `identifier` | flag or `= bool` | tag events with a per-call id |
//! | `log_exception` | flag or `= bool` | report errors and panics |
//! | `single_exception` | flag or `= bool` | merge exit and error events |
//! | `name` | `= "..."` | logged function name |
//! | `skip` | `(a, self)` | leave parameters out of the snapshot |
//! | `skip_all` | flag | log an empty snapshot |
//!
//! Omitted keys fall back to `LOGF_*` environment variables, then defaults.
//!
//! ## Example
//!
//! ```ignore
//! use logf::logf;
//!
//! #[logf(level = "INFO", single_msg, skip(password))]
//! fn login(user: &str, password: &str) -> Result<u64, String> {
//!     Ok(42)
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod logf;
mod support;

/// Log every call of the annotated function.
///
/// Works on free functions, associated functions and methods, blocking or
/// `async`. The signature is unchanged.
///
/// - Arguments are rendered with `Debug` before the body runs; values
///   without `Debug` show as `<unrepr>`.
/// - Return values are rendered as text when they are strings or
///   characters, otherwise with `Debug`.
/// - A return type whose last path segment is `Result` is fallible: `Err`
///   is reported as raised, rendered with `Display`.
/// - Panics are reported as raised and then resumed unchanged.
/// - `async fn` bodies are timed from the first poll to completion, across
///   every suspension point.
///
/// Unknown keys and invalid level names are compile errors.
///
/// # Example
///
/// ```ignore
/// #[logf(max_str_len = 5)]
/// fn my_function(a: &str, b: &str) -> String {
///     format!("{a}{b}c")
/// }
///
/// #[logf(level = "INFO", log_exec_time)]
/// async fn fetch(id: u64) -> std::io::Result<Vec<u8>> {
///     Ok(vec![])
/// }
/// ```
#[proc_macro_attribute]
pub fn logf(args: TokenStream, item: TokenStream) -> TokenStream {
    logf::attribute(args, item)
}

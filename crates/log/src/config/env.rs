//! Frozen view of the `LOGF_*` environment overrides
//!
//! Resolution never reads the process environment piecemeal: the variables
//! are captured once into an [`EnvSnapshot`] and every field is resolved
//! against that snapshot.

use std::collections::BTreeMap;

use super::Level;

/// Severity override
pub const LOGF_LEVEL: &str = "LOGF_LEVEL";
/// Truncation limit override (`N` or `None`)
pub const LOGF_MAX_STR_LEN: &str = "LOGF_MAX_STR_LEN";
/// Single-message mode override
pub const LOGF_SINGLE_MSG: &str = "LOGF_SINGLE_MSG";
/// Stdout routing override
pub const LOGF_USE_PRINT: &str = "LOGF_USE_PRINT";
/// Stack capture override
pub const LOGF_STACK_INFO: &str = "LOGF_STACK_INFO";
/// Elapsed time reporting override
pub const LOGF_LOG_EXEC_TIME: &str = "LOGF_LOG_EXEC_TIME";
/// Argument reporting override
pub const LOGF_LOG_ARGS: &str = "LOGF_LOG_ARGS";
/// Return value reporting override
pub const LOGF_LOG_RETURN: &str = "LOGF_LOG_RETURN";
/// Exception reporting override
pub const LOGF_LOG_EXCEPTION: &str = "LOGF_LOG_EXCEPTION";
/// Named sink override
pub const LOGF_USE_LOGGER: &str = "LOGF_USE_LOGGER";
/// Combined exception event override
pub const LOGF_SINGLE_EXCEPTION: &str = "LOGF_SINGLE_EXCEPTION";
/// Correlation identifier override
pub const LOGF_IDENTIFIER: &str = "LOGF_IDENTIFIER";

/// Every variable the resolver consults
pub const ENV_VARS: [&str; 12] = [
    LOGF_LEVEL,
    LOGF_MAX_STR_LEN,
    LOGF_SINGLE_MSG,
    LOGF_USE_PRINT,
    LOGF_STACK_INFO,
    LOGF_LOG_EXEC_TIME,
    LOGF_LOG_ARGS,
    LOGF_LOG_RETURN,
    LOGF_LOG_EXCEPTION,
    LOGF_USE_LOGGER,
    LOGF_SINGLE_EXCEPTION,
    LOGF_IDENTIFIER,
];

/// Immutable copy of the `LOGF_*` variables taken at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<&'static str, String>,
}

impl EnvSnapshot {
    /// Read every `LOGF_*` variable from the process environment once
    pub fn capture() -> Self {
        let vars = ENV_VARS
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key, value)))
            .collect();
        Self { vars }
    }

    /// Snapshot with no overrides
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add an override. Names outside the `LOGF_*` set are ignored.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        if let Some(known) = ENV_VARS.into_iter().find(|known| *known == key) {
            self.vars.insert(known, value.into());
        }
        self
    }

    /// Raw value of a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of overrides present
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no override is present
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub(crate) fn flag(&self, key: &'static str) -> Option<bool> {
        let raw = self.get(key)?;
        let parsed = parse_bool(raw);
        if parsed.is_none() {
            tracing::debug!(target: "logf", var = key, value = raw, "ignoring malformed boolean override");
        }
        parsed
    }

    pub(crate) fn level(&self) -> Option<Level> {
        let raw = self.get(LOGF_LEVEL)?;
        match raw.parse() {
            Ok(level) => Some(level),
            Err(e) => {
                tracing::debug!(target: "logf", var = LOGF_LEVEL, error = %e, "ignoring malformed level override");
                None
            }
        }
    }

    /// `Some(None)` means "unlimited", `None` means "no usable override".
    pub(crate) fn max_str_len(&self) -> Option<Option<usize>> {
        let raw = self.get(LOGF_MAX_STR_LEN)?;
        let parsed = parse_max_str_len(raw);
        if parsed.is_none() {
            tracing::debug!(target: "logf", var = LOGF_MAX_STR_LEN, value = raw, "ignoring malformed length override");
        }
        parsed
    }

    pub(crate) fn logger(&self) -> Option<String> {
        self.get(LOGF_USE_LOGGER)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |snapshot, (key, value)| {
                snapshot.with(key.as_ref(), value)
            })
    }
}

/// Case-insensitive `true` / `false`; anything else is rejected
pub fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Non-negative integer, or one of `None` / `NONE` / `none` for unlimited
pub fn parse_max_str_len(raw: &str) -> Option<Option<usize>> {
    match raw.trim() {
        "None" | "NONE" | "none" => Some(None),
        digits => digits.parse::<usize>().ok().map(Some),
    }
}

//! Severity levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity attached to every event of an instrumented call.
///
/// Levels carry the numeric ranks callers may already use in
/// configuration (`10` for `DEBUG` up to `50` for `CRITICAL`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Rank 10
    #[default]
    Debug,
    /// Rank 20
    Info,
    /// Rank 30
    #[serde(alias = "WARN")]
    Warning,
    /// Rank 40
    Error,
    /// Rank 50
    Critical,
}

/// Error returned when a level name or rank is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level '{0}', expected DEBUG, INFO, WARNING, ERROR, CRITICAL or 10..=50")]
pub struct ParseLevelError(pub String);

impl Level {
    /// All levels, lowest rank first
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Numeric rank of the level
    pub const fn rank(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    /// Level with exactly this rank
    pub fn from_rank(rank: u64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| u64::from(level.rank()) == rank)
    }

    /// Symbolic name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Closest `tracing` level. `CRITICAL` has no counterpart and maps to `ERROR`.
    pub const fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<u64>() {
            return Self::from_rank(rank).ok_or_else(|| ParseLevelError(s.to_string()));
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" | "FATAL" => Ok(Self::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        level.to_tracing()
    }
}

//! Error type for logger bootstrap operations

/// Result type for logger bootstrap operations
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logger bootstrap operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filter parsing error
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// The filter directive that failed to parse
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber was already installed
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

impl LogError {
    /// Create a filter parsing error
    pub fn filter(filter: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }
}

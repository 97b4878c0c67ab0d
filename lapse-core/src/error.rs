//! # Error Types
//!
//! Errors raised while setting up lapse: configuration validation and task runner startup.
//! Controllers never return these; they log them and keep their current state.

use thiserror::Error;

/// Errors that can occur while configuring or starting lapse.
#[derive(Error, Debug)]
pub enum LapseError {
    /// The stopwatch tick period was zero.
    #[error("Tick period must be greater than zero")]
    ZeroTickPeriod,

    /// A setting had a value that can't be used.
    #[error("Invalid setting `{key}`: {details}")]
    InvalidSetting {
        /// The dotted key of the setting, e.g. `stopwatch.tick_period_ms`.
        key: String,
        /// What was wrong with it.
        details: String,
    },

    /// A tick source was requested on a thread without a running async runtime.
    #[error("No async runtime is running on this thread")]
    NoRuntime,

    /// Building the async runtime failed.
    #[error("Failed to build task runner: {source}")]
    RuntimeBuild {
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for lapse setup operations.
pub type LapseResult<T> = Result<T, LapseError>;

impl LapseError {
    /// Create an invalid setting error.
    pub fn invalid_setting(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            details: details.into(),
        }
    }
}

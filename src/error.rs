//! Error types for the cache crate
//!
//! Cache operations themselves are total and never fail; errors only arise
//! while configuring or driving the benchmark harness.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// An environment variable held a value that cannot be used
    #[error("Invalid config {var}={value:?}: {reason}")]
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A spawned benchmark task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// The benchmark report could not be serialized
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl CacheError {
    /// Builds an `InvalidConfig` error for the given variable.
    pub fn invalid_config(
        var: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CacheError::InvalidConfig {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::TaskFailed(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

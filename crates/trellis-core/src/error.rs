//! Error taxonomy for retrieval operations
//!
//! Three failure classes cover the whole workspace: the backend is
//! unreachable, the caller handed us a malformed query, or a configuration
//! value was rejected at construction. An empty frontier is normal
//! termination and never surfaces as an error.

use thiserror::Error;

/// Error type shared by adapters and traversal engines
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Connection or transport failure talking to a backend.
    ///
    /// Retried once during frontier expansion; fatal during seeding.
    #[error("backend unavailable: {message}")]
    BackendUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed query input: wrong vector dimension, zero k.
    ///
    /// Never retried, surfaces to the caller immediately.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Rejected configuration value (empty edge fields, lambda out of range)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RetrievalError {
    /// Build a `BackendUnavailable` with no underlying cause
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Build a `BackendUnavailable` wrapping the originating error
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the expansion step may retry after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

/// Result type for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;

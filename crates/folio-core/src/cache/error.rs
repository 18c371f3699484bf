//! Cache error handling
//!
//! Provides typed errors for cache operations with descriptive messages
//! and recovery suggestions.

use thiserror::Error;

/// Errors that can occur while talking to a cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backend could not serve the request
    #[error("Cache backend '{backend}' is unavailable: {details}")]
    Unavailable { backend: String, details: String },

    /// A value could not be encoded or decoded as JSON
    #[error("Failed to (de)serialize cached value under '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Create an unavailability error for the named backend
    pub fn unavailable(backend: impl Into<String>, details: impl Into<String>) -> Self {
        CacheError::Unavailable {
            backend: backend.into(),
            details: details.into(),
        }
    }

    /// Check if retrying the operation later could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CacheError::Unavailable { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CacheError::Unavailable { .. } => {
                Some("Check that the cache backend is reachable and try again.")
            }
            CacheError::Serialization { .. } => Some(
                "The cached value has an unexpected shape. Delete the key so it can be rebuilt.",
            ),
        }
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

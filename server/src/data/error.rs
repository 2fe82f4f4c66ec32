//! Unified error type for the data layer

use thiserror::Error;

/// Errors surfaced by the datastore collaborator.
///
/// Everything here is fatal to the request that triggered it; retry policy,
/// if any, belongs to the caller's deployment, not this layer.
#[derive(Error, Debug)]
pub enum DataError {
    /// Transport-level failure reaching the datastore
    #[error("datastore request failed: {0}")]
    Http(reqwest::Error),

    /// The datastore answered with an error payload
    #[error("datastore returned an error: {0}")]
    Backend(String),

    /// The datastore answered with a payload we could not decode
    #[error("failed to decode datastore response: {0}")]
    Decode(String),

    /// The datastore did not answer within the configured timeout
    #[error("datastore timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The resource does not exist in the datastore
    #[error("unknown resource: {0}")]
    ResourceNotFound(String),
}

impl DataError {
    /// Classify a transport error, folding timeouts into their own kind so
    /// the API layer reports them uniformly.
    pub fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Http(e)
        }
    }

    /// True for faults worth reporting as "datastore unavailable" rather
    /// than an internal failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_includes_duration() {
        let err = DataError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "datastore timeout after 30s");
        assert!(err.is_unavailable());
    }

    #[test]
    fn backend_errors_are_not_unavailable() {
        assert!(!DataError::Backend("boom".into()).is_unavailable());
        assert!(!DataError::ResourceNotFound("res-1".into()).is_unavailable());
    }
}

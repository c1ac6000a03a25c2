//! Failure taxonomy for health-data provider calls.
//!
//! Four kinds are known to come out of the provider and are surfaced to the
//! user as a screen error. Anything else is `Unexpected` and must reach the
//! task runner instead of being shown as a user-facing error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("Security violation: {0}")]
    Security(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state: {0}")]
    IllegalState(String),

    #[error("Unexpected provider failure: {0}")]
    Unexpected(String),
}

/// Classified failure kinds, as shown to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Remote,
    Security,
    Io,
    IllegalState,
}

impl ProviderError {
    /// `None` for failures outside the classified set.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ProviderError::Remote(_) => Some(FailureKind::Remote),
            ProviderError::Security(_) => Some(FailureKind::Security),
            ProviderError::Io(_) => Some(FailureKind::Io),
            ProviderError::IllegalState(_) => Some(FailureKind::IllegalState),
            ProviderError::Unexpected(_) => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.kind().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_kinds() {
        assert_eq!(ProviderError::Remote("x".into()).kind(), Some(FailureKind::Remote));
        assert_eq!(ProviderError::Security("x".into()).kind(), Some(FailureKind::Security));
        assert_eq!(
            ProviderError::IllegalState("x".into()).kind(),
            Some(FailureKind::IllegalState)
        );
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert_eq!(ProviderError::from(io).kind(), Some(FailureKind::Io));
    }

    #[test]
    fn unexpected_is_unclassified() {
        let err = ProviderError::Unexpected("null pointer".into());
        assert!(!err.is_classified());
        assert!(err.kind().is_none());
    }

    #[test]
    fn messages_carry_detail() {
        let err = ProviderError::Remote("service unavailable".into());
        assert_eq!(err.to_string(), "Remote call failed: service unavailable");
    }
}

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::provider::{FailureKind, ProviderError};

/// Outcome of the most recent load, as seen by the screen.
#[derive(Debug, Clone, Default)]
pub enum UiState {
    #[default]
    Uninitialized,
    Done,
    /// `occurrence_id` is fresh per error so a screen can tell a repeated
    /// render of the same error apart from a new one with the same cause.
    Error {
        cause: Arc<ProviderError>,
        occurrence_id: Uuid,
    },
}

impl UiState {
    pub fn error(cause: ProviderError) -> Self {
        UiState::Error {
            cause: Arc::new(cause),
            occurrence_id: Uuid::new_v4(),
        }
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, UiState::Uninitialized)
    }

    pub fn occurrence_id(&self) -> Option<Uuid> {
        match self {
            UiState::Error { occurrence_id, .. } => Some(*occurrence_id),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> UiStatePayload {
        match self {
            UiState::Uninitialized => UiStatePayload::Uninitialized,
            UiState::Done => UiStatePayload::Done,
            UiState::Error {
                cause,
                occurrence_id,
            } => UiStatePayload::Error {
                kind: cause.kind(),
                message: cause.to_string(),
                occurrence_id: *occurrence_id,
            },
        }
    }
}

impl PartialEq for UiState {
    /// Errors compare by occurrence, not by cause.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UiState::Uninitialized, UiState::Uninitialized) => true,
            (UiState::Done, UiState::Done) => true,
            (UiState::Error { occurrence_id: a, .. }, UiState::Error { occurrence_id: b, .. }) => {
                a == b
            }
            _ => false,
        }
    }
}

/// Serializable view of [`UiState`] for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UiStatePayload {
    Uninitialized,
    Done,
    Error {
        kind: Option<FailureKind>,
        message: String,
        occurrence_id: Uuid,
    },
}

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::CallbackStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("Cannot move callback request from {current} to {requested}")]
    InvalidTransition {
        current: CallbackStatus,
        requested: CallbackStatus,
    },
    #[error("A call is already being placed for callback request {0}")]
    CallInProgress(Uuid),
    #[error("Voice call provider failed: {0}")]
    ExternalProvider(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DomainError {
    pub fn invalid_transition(current: CallbackStatus, requested: CallbackStatus) -> Self {
        Self::InvalidTransition { current, requested }
    }
}

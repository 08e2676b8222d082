//! Domain errors

use match_events::PublishError;
use thiserror::Error;
use uuid::Uuid;

use crate::realtime::NotifyError;
use crate::repositories::RepositoryError;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotAuthorized(String),

    #[error("Match with id {0} wasn't found")]
    MatchNotFound(Uuid),

    #[error("Match with id {0} already exists")]
    MatchAlreadyExists(Uuid),

    #[error("{0}")]
    InvalidState(String),

    #[error("Match was modified concurrently, retry the command")]
    SaveConflict,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Event publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Realtime notify error: {0}")]
    Notify(#[from] NotifyError),
}

impl DomainError {
    /// Lost per-row concurrency races are safe to retry from scratch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::SaveConflict)
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}

impl From<RepositoryError> for DomainError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict(_) => DomainError::SaveConflict,
            RepositoryError::Database(msg) => DomainError::Database(msg),
        }
    }
}

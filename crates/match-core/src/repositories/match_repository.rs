//! Match repository trait (port)

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Match;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Per-row concurrency control rejected the write; the command saw a
    /// stale record and must be retried from the read.
    #[error("Concurrent modification of match {0}")]
    Conflict(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

/// Persistence seam for match records, keyed by match id. The store and its
/// per-row concurrency control live behind this trait.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn get_by_id(&self, match_id: Uuid) -> Result<Option<Match>, RepositoryError>;
    async fn insert(&self, chess_match: &Match) -> Result<(), RepositoryError>;
    async fn update(&self, chess_match: &Match) -> Result<(), RepositoryError>;
    async fn delete(&self, match_id: Uuid) -> Result<(), RepositoryError>;
}

//! Repository traits (ports)

pub mod match_repository;

pub use match_repository::{MatchRepository, RepositoryError};

//! # Match Core
//!
//! Domain entities, command services, and ports for the match lifecycle.

pub mod consumers;
pub mod domain;
pub mod error;
pub mod realtime;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;

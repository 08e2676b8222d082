//! Domain entities for the match lifecycle.

pub mod chess_match;
pub mod options;

// Re-export all entities and enums
pub use chess_match::{DrawDescriptor, Match, MatchStatus, WinDescriptor};
pub use options::CreateMatchOptions;

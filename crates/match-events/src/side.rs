//! Board side shared by events and domain state

use serde::{Deserialize, Serialize};

/// One of the two sides of a match. Exactly one side's clock runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSide {
    White,
    Black,
}

impl MatchSide {
    pub fn opponent(&self) -> Self {
        match self {
            MatchSide::White => MatchSide::Black,
            MatchSide::Black => MatchSide::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSide::White => "white",
            MatchSide::Black => "black",
        }
    }

    /// Wire index used by the original contract: 0 = white, 1 = black.
    pub fn as_index(&self) -> i32 {
        match self {
            MatchSide::White => 0,
            MatchSide::Black => 1,
        }
    }

    pub fn from_index(idx: i32) -> Option<Self> {
        match idx {
            0 => Some(MatchSide::White),
            1 => Some(MatchSide::Black),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involutive() {
        assert_eq!(MatchSide::White.opponent(), MatchSide::Black);
        assert_eq!(MatchSide::Black.opponent().opponent(), MatchSide::Black);
    }

    #[test]
    fn test_index_round_trip() {
        assert_eq!(MatchSide::from_index(0), Some(MatchSide::White));
        assert_eq!(MatchSide::from_index(1), Some(MatchSide::Black));
        assert_eq!(MatchSide::from_index(2), None);
        assert_eq!(MatchSide::Black.as_index(), 1);
    }
}

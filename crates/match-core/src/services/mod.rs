//! Domain services (business logic)

pub mod clock;
pub mod match_service;

pub use match_service::{
    DrawRejectOutcome, DrawRequestOutcome, MatchCreatedInfo, MatchFinishedInfo, MatchInfo,
    MatchService, MatchStartedInfo,
};

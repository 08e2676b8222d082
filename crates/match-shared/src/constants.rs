//! Application-wide constants

/// Allowed match time limit, in seconds.
pub const MIN_TIME_LIMIT: i64 = 180;
pub const MAX_TIME_LIMIT: i64 = 7200;

/// Allowed per-move time increment, in seconds.
pub const MIN_EXTRA_TIME_PER_MOVE: i64 = 5;
pub const MAX_EXTRA_TIME_PER_MOVE: i64 = 300;

/// Engine difficulty bounds for vs-bot matches.
pub const MIN_AI_LEVEL: i32 = 1;
pub const MAX_AI_LEVEL: i32 = 25;

/// Default cadence of the expiration sweep loop, in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Standard chess starting position.
pub const DEFAULT_CHESS_POSITION: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

//! Time-control evaluator
//!
//! A chess clock runs exactly one side's time at once, so only the acting
//! side's clock is ever evaluated.

use chrono::{DateTime, Utc};

use crate::domain::Match;

/// If the acting side has run out of time at `now`, returns the winning
/// player (the one playing the opposite side). Pure: no clock reads, no
/// mutation.
///
/// Elapsed time counts from the last move, or from the start of the match
/// while no move has been made. Untimed matches never expire.
pub fn time_expired_winner(chess_match: &Match, now: DateTime<Utc>) -> Option<String> {
    let acting = chess_match.acting_side?;
    let remaining = chess_match.remaining_time_of(acting)?;
    let clock_running_since = chess_match
        .last_move_at_utc
        .or(chess_match.started_at_utc)?;

    let elapsed = (now - clock_running_since).num_seconds();
    if elapsed < remaining {
        return None;
    }

    chess_match
        .player_of(acting.opponent())
        .map(|winner| winner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateMatchOptions;
    use chrono::Duration;
    use match_events::MatchSide;
    use uuid::Uuid;

    fn timed_match(time_limit: i64) -> Match {
        let mut m = Match::new(
            Uuid::new_v4(),
            "alice".to_string(),
            &CreateMatchOptions {
                time_limit: Some(time_limit),
                ..Default::default()
            },
        );
        m.start("bob".to_string(), "alice".to_string(), Utc::now());
        m
    }

    #[test]
    fn test_untimed_match_never_expires() {
        let mut m = Match::new(
            Uuid::new_v4(),
            "alice".to_string(),
            &CreateMatchOptions::default(),
        );
        m.start("bob".to_string(), "alice".to_string(), Utc::now());

        let far_future = Utc::now() + Duration::days(365);
        assert_eq!(time_expired_winner(&m, far_future), None);
    }

    #[test]
    fn test_no_expiry_before_remaining_time_elapses() {
        let m = timed_match(300);
        let now = m.started_at_utc.unwrap() + Duration::seconds(299);
        assert_eq!(time_expired_winner(&m, now), None);
    }

    #[test]
    fn test_acting_side_expires_from_start_instant() {
        let m = timed_match(300);
        let now = m.started_at_utc.unwrap() + Duration::seconds(300);
        // White (alice) is acting and out of time, so black (bob) wins.
        assert_eq!(time_expired_winner(&m, now), Some("bob".to_string()));
    }

    #[test]
    fn test_elapsed_counts_from_last_move() {
        let mut m = timed_match(300);
        m.last_move_at_utc = Some(m.started_at_utc.unwrap() + Duration::seconds(250));

        let just_before = m.last_move_at_utc.unwrap() + Duration::seconds(299);
        assert_eq!(time_expired_winner(&m, just_before), None);

        let at_expiry = m.last_move_at_utc.unwrap() + Duration::seconds(300);
        assert_eq!(time_expired_winner(&m, at_expiry), Some("bob".to_string()));
    }

    #[test]
    fn test_only_acting_side_clock_is_evaluated() {
        let mut m = timed_match(300);
        // Black to act with plenty of time; white's clock is nearly gone but
        // idle, so no expiry may be declared.
        m.acting_side = Some(MatchSide::Black);
        m.white_side_time_remaining = Some(1);
        m.black_side_time_remaining = Some(300);

        let now = m.started_at_utc.unwrap() + Duration::seconds(120);
        assert_eq!(time_expired_winner(&m, now), None);
    }

    #[test]
    fn test_finished_match_never_expires() {
        let mut m = timed_match(300);
        m.finish_with_win(
            "bob".to_string(),
            crate::domain::WinDescriptor::Resignation,
            Utc::now(),
        );
        let now = Utc::now() + Duration::hours(2);
        assert_eq!(time_expired_winner(&m, now), None);
    }
}

// ============================================================================
// Match Core - TimedOut Consumer
// File: crates/match-core/src/consumers/timed_out.rs
// ============================================================================
//! Finalizes a match on a timeout notification from the expiration service.
//!
//! Delivery is at-least-once and races every other finishing path, so the
//! handler is idempotent: anything but an `InProgress` match is discarded.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use match_events::{EventPublisher, MatchSide};

use crate::domain::{MatchStatus, WinDescriptor};
use crate::error::DomainError;
use crate::realtime::MatchNotifier;
use crate::repositories::MatchRepository;
use crate::services::match_service::{match_finished_event, MatchFinishedInfo};

pub struct TimedOutConsumer<R: MatchRepository, P: EventPublisher, N: MatchNotifier> {
    match_repo: Arc<R>,
    publisher: Arc<P>,
    notifier: Arc<N>,
}

impl<R: MatchRepository, P: EventPublisher, N: MatchNotifier> TimedOutConsumer<R, P, N> {
    pub fn new(match_repo: Arc<R>, publisher: Arc<P>, notifier: Arc<N>) -> Self {
        Self {
            match_repo,
            publisher,
            notifier,
        }
    }

    pub async fn consume(
        &self,
        match_id: Uuid,
        timed_out_side: MatchSide,
    ) -> Result<(), DomainError> {
        // 1. A missing record is a protocol anomaly, not a failure
        let Some(mut chess_match) = self.match_repo.get_by_id(match_id).await? else {
            warn!("Timeout notification for unknown match {}", match_id);
            return Ok(());
        };

        // 2. Already finished through another path: absorb the duplicate
        if chess_match.status != MatchStatus::InProgress {
            debug!(
                "Timeout for match {} discarded, status is {}",
                match_id,
                chess_match.status.as_str()
            );
            return Ok(());
        }

        // 3. The side that didn't flag takes the point
        let Some(winner) = chess_match
            .player_of(timed_out_side.opponent())
            .map(String::from)
        else {
            warn!(
                "Timeout for match {} has no resolvable winner, discarded",
                match_id
            );
            return Ok(());
        };

        let now = Utc::now();
        chess_match.finish_with_win(winner, WinDescriptor::OnTime, now);
        self.match_repo.update(&chess_match).await?;

        self.publisher
            .publish(match_finished_event(&chess_match))
            .await?;

        let finished = MatchFinishedInfo::from_match(&chess_match);
        self.notifier
            .notify(
                match_id,
                "MatchFinished",
                serde_json::to_value(&finished)
                    .map_err(|e| DomainError::Database(e.to_string()))?,
            )
            .await?;

        info!(
            "Match {} finished on time, {} side flagged",
            match_id,
            timed_out_side.as_str()
        );
        Ok(())
    }
}

// ============================================================================
// Match Core - Match Service
// File: crates/match-core/src/services/match_service.rs
// ============================================================================
//! Match lifecycle service: one operation per inbound command.
//!
//! Commands against the same match are serialized by the store's per-row
//! concurrency control; a lost race surfaces as a retryable conflict. Each
//! command persists its full transition before publishing the matching
//! event, and every command that can tie with a running-out clock consults
//! the clock evaluator first.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use match_events::{EventPublisher, MatchEvent, MatchSide};

use crate::domain::{CreateMatchOptions, DrawDescriptor, Match, MatchStatus, WinDescriptor};
use crate::error::DomainError;
use crate::repositories::MatchRepository;
use crate::services::clock;

/// Match lifecycle service handling create/accept/cancel/draw/resign flows
pub struct MatchService<R: MatchRepository, P: EventPublisher> {
    match_repo: Arc<R>,
    publisher: Arc<P>,
}

impl<R: MatchRepository, P: EventPublisher> MatchService<R, P> {
    pub fn new(match_repo: Arc<R>, publisher: Arc<P>) -> Self {
        Self {
            match_repo,
            publisher,
        }
    }

    /// Create a new match in `Created` status.
    pub async fn create(
        &self,
        match_id: Uuid,
        options: CreateMatchOptions,
        requester: &str,
    ) -> Result<MatchCreatedInfo, DomainError> {
        // 1. Reject malformed options before touching any state
        options.validate()?;

        // 2. Match ids are caller-supplied, so duplicates are a conflict
        if self.match_repo.get_by_id(match_id).await?.is_some() {
            warn!("Create rejected: match {} already exists", match_id);
            return Err(DomainError::MatchAlreadyExists(match_id));
        }

        // 3. Persist, then announce
        let chess_match = Match::new(match_id, requester.to_string(), &options);
        self.match_repo.insert(&chess_match).await?;

        self.publisher
            .publish(MatchEvent::MatchCreated {
                match_id,
                created_at_utc: chess_match.created_at_utc,
                vs_bot: chess_match.ai_level.is_some(),
                ai_level: chess_match.ai_level,
                time_limit: chess_match.time_limit,
                extra_time_per_move: chess_match.extra_time_per_move,
                first_to_act_side: chess_match.first_to_act_side,
                creator: chess_match.creator.clone(),
            })
            .await?;

        info!("Match {} created by {}", match_id, requester);

        Ok(MatchCreatedInfo {
            match_id,
            created_at_utc: chess_match.created_at_utc,
            creator: chess_match.creator,
        })
    }

    /// Accept a pending match, starting the game.
    pub async fn accept(
        &self,
        match_id: Uuid,
        requester: &str,
    ) -> Result<MatchStartedInfo, DomainError> {
        let mut chess_match = self.get_required(match_id).await?;

        if chess_match.status != MatchStatus::Created {
            return Err(DomainError::InvalidState(
                "Only not started match can be accepted".to_string(),
            ));
        }
        if requester == chess_match.creator {
            return Err(DomainError::NotAuthorized(
                "Match can't be accepted by match creator".to_string(),
            ));
        }

        // Explicit color choice maps 0 -> creator, 1 -> acceptor; otherwise
        // the white player is picked uniformly at random.
        let white_side_player = match chess_match.first_to_act_side {
            Some(0) => chess_match.creator.clone(),
            Some(_) => requester.to_string(),
            None => {
                if rand::rng().random_range(0..2) == 0 {
                    chess_match.creator.clone()
                } else {
                    requester.to_string()
                }
            }
        };

        let now = Utc::now();
        chess_match.start(requester.to_string(), white_side_player.clone(), now);
        self.match_repo.update(&chess_match).await?;

        self.publisher
            .publish(MatchEvent::MatchStarted {
                match_id,
                started_at_utc: now,
                acceptor: requester.to_string(),
                white_side_player: white_side_player.clone(),
            })
            .await?;

        // A timed match immediately puts the white side on the clock
        if let Some(time_limit) = chess_match.time_limit {
            self.publisher
                .publish(MatchEvent::SideToActChanged {
                    match_id,
                    side_to_act: MatchSide::White,
                    exp_time_utc: now + Duration::seconds(time_limit),
                })
                .await?;
        }

        info!(
            "Match {} accepted by {}, {} plays white",
            match_id, requester, white_side_player
        );

        Ok(MatchStartedInfo {
            match_id,
            started_at_utc: now,
            acceptor: requester.to_string(),
            white_side_player,
        })
    }

    /// Cancel a match that never started. The record is deleted.
    pub async fn cancel(&self, match_id: Uuid, requester: &str) -> Result<(), DomainError> {
        let chess_match = self.get_required(match_id).await?;

        if chess_match.status != MatchStatus::Created {
            return Err(DomainError::InvalidState(
                "Only not started match can be cancelled".to_string(),
            ));
        }
        if requester != chess_match.creator {
            return Err(DomainError::NotAuthorized(
                "Match can be cancelled only by match creator".to_string(),
            ));
        }

        self.match_repo.delete(match_id).await?;
        self.publisher
            .publish(MatchEvent::MatchCancelled { match_id })
            .await?;

        info!("Match {} cancelled by {}", match_id, requester);
        Ok(())
    }

    /// Request a draw. Only the idle side may ask; if the acting side's
    /// clock has already run out the match finishes on time instead.
    pub async fn request_draw(
        &self,
        match_id: Uuid,
        requester: &str,
    ) -> Result<DrawRequestOutcome, DomainError> {
        let mut chess_match = self.get_required(match_id).await?;

        if !chess_match.is_participant(requester) {
            return Err(DomainError::NotAuthorized(
                "Draw can be requested only by match participant".to_string(),
            ));
        }
        if chess_match.status != MatchStatus::InProgress {
            return Err(DomainError::InvalidState(
                "Draw can be requested only on active match".to_string(),
            ));
        }
        if chess_match.draw_requested_side.is_some() {
            return Err(DomainError::InvalidState(
                "Draw has been already requested".to_string(),
            ));
        }
        let Some(acting_side) = chess_match.acting_side else {
            return Err(DomainError::InvalidState(
                "Match has no side to act".to_string(),
            ));
        };
        if chess_match.side_of(requester) == Some(acting_side) {
            return Err(DomainError::NotAuthorized(
                "Draw can be requested only by idle side of the match".to_string(),
            ));
        }

        let now = Utc::now();
        if let Some(winner) = clock::time_expired_winner(&chess_match, now) {
            return Ok(DrawRequestOutcome::Finished(
                self.finish_on_time(chess_match, winner, now).await?,
            ));
        }

        let req_side = acting_side.opponent();
        chess_match.draw_requested_side = Some(req_side);
        self.match_repo.update(&chess_match).await?;

        self.publisher
            .publish(MatchEvent::DrawRequested { match_id, req_side })
            .await?;

        info!("Draw requested on match {} by {}", match_id, requester);
        Ok(DrawRequestOutcome::Requested { req_side })
    }

    /// Accept a pending draw request. Only the acting side may answer, and
    /// an already-expired clock wins the race over the agreement.
    pub async fn accept_draw(
        &self,
        match_id: Uuid,
        requester: &str,
    ) -> Result<MatchFinishedInfo, DomainError> {
        let mut chess_match = self
            .get_answerable_draw_match(match_id, requester, "accepted")
            .await?;

        let now = Utc::now();
        if let Some(winner) = clock::time_expired_winner(&chess_match, now) {
            return self.finish_on_time(chess_match, winner, now).await;
        }

        chess_match.finish_with_draw(DrawDescriptor::Agreement, now);
        self.match_repo.update(&chess_match).await?;
        self.publisher
            .publish(match_finished_event(&chess_match))
            .await?;

        info!("Match {} drawn by agreement", match_id);
        Ok(MatchFinishedInfo::from_match(&chess_match))
    }

    /// Reject a pending draw request. Same authorization as accepting; an
    /// already-expired clock finishes the match on time instead.
    pub async fn reject_draw(
        &self,
        match_id: Uuid,
        requester: &str,
    ) -> Result<DrawRejectOutcome, DomainError> {
        let mut chess_match = self
            .get_answerable_draw_match(match_id, requester, "rejected")
            .await?;

        let now = Utc::now();
        if let Some(winner) = clock::time_expired_winner(&chess_match, now) {
            return Ok(DrawRejectOutcome::Finished(
                self.finish_on_time(chess_match, winner, now).await?,
            ));
        }

        chess_match.draw_requested_side = None;
        self.match_repo.update(&chess_match).await?;
        self.publisher
            .publish(MatchEvent::DrawRejected { match_id })
            .await?;

        info!("Draw rejected on match {} by {}", match_id, requester);
        Ok(DrawRejectOutcome::Rejected)
    }

    /// Resign. The opponent wins immediately; resignation always beats a
    /// silently expired clock.
    pub async fn resign(
        &self,
        match_id: Uuid,
        requester: &str,
    ) -> Result<MatchFinishedInfo, DomainError> {
        let mut chess_match = self.get_required(match_id).await?;

        if !chess_match.is_participant(requester) {
            return Err(DomainError::NotAuthorized(
                "Resignation can be requested only by match participant".to_string(),
            ));
        }
        if chess_match.status != MatchStatus::InProgress {
            return Err(DomainError::InvalidState(
                "Resignation can be requested only on active match".to_string(),
            ));
        }
        let Some(winner) = chess_match.opponent_of(requester).map(String::from) else {
            return Err(DomainError::InvalidState(
                "Match has no opponent to win".to_string(),
            ));
        };

        let now = Utc::now();
        chess_match.finish_with_win(winner, WinDescriptor::Resignation, now);
        self.match_repo.update(&chess_match).await?;
        self.publisher
            .publish(match_finished_event(&chess_match))
            .await?;

        info!("Match {} finished, {} resigned", match_id, requester);
        Ok(MatchFinishedInfo::from_match(&chess_match))
    }

    /// Read-only projection of the current match state.
    pub async fn get_current(&self, match_id: Uuid) -> Result<MatchInfo, DomainError> {
        let chess_match = self.get_required(match_id).await?;
        debug!("Match {} projected for read", match_id);
        Ok(MatchInfo::from(&chess_match))
    }

    async fn get_required(&self, match_id: Uuid) -> Result<Match, DomainError> {
        self.match_repo
            .get_by_id(match_id)
            .await?
            .ok_or(DomainError::MatchNotFound(match_id))
    }

    /// Shared preconditions of answering a draw request: in progress, a
    /// pending request exists, and the requester plays the acting side.
    async fn get_answerable_draw_match(
        &self,
        match_id: Uuid,
        requester: &str,
        action: &str,
    ) -> Result<Match, DomainError> {
        let chess_match = self.get_required(match_id).await?;

        if !chess_match.is_participant(requester) {
            return Err(DomainError::NotAuthorized(format!(
                "Draw can be {action} only by match participant"
            )));
        }
        if chess_match.status != MatchStatus::InProgress {
            return Err(DomainError::InvalidState(format!(
                "Draw can be {action} only on active match"
            )));
        }
        if chess_match.draw_requested_side.is_none() {
            return Err(DomainError::InvalidState(
                "Can't answer draw because there wasn't previous request".to_string(),
            ));
        }
        if chess_match.side_of(requester) != chess_match.acting_side {
            return Err(DomainError::NotAuthorized(format!(
                "Draw can be {action} only by active side of the match"
            )));
        }

        Ok(chess_match)
    }

    async fn finish_on_time(
        &self,
        mut chess_match: Match,
        winner: String,
        now: DateTime<Utc>,
    ) -> Result<MatchFinishedInfo, DomainError> {
        chess_match.finish_with_win(winner, WinDescriptor::OnTime, now);
        self.match_repo.update(&chess_match).await?;
        self.publisher
            .publish(match_finished_event(&chess_match))
            .await?;

        info!("Match {} finished on time", chess_match.match_id);
        Ok(MatchFinishedInfo::from_match(&chess_match))
    }
}

pub(crate) fn match_finished_event(chess_match: &Match) -> MatchEvent {
    MatchEvent::MatchFinished {
        match_id: chess_match.match_id,
        ended_at_utc: chess_match.ended_at_utc.unwrap_or_else(Utc::now),
        winner: chess_match.winner.clone(),
        win_by: chess_match.win_by.map(|w| w.as_str().to_string()),
        draw_by: chess_match.draw_by.map(|d| d.as_str().to_string()),
    }
}

/// Result of a successful create
#[derive(Debug, Clone, Serialize)]
pub struct MatchCreatedInfo {
    pub match_id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub creator: String,
}

/// Result of a successful accept
#[derive(Debug, Clone, Serialize)]
pub struct MatchStartedInfo {
    pub match_id: Uuid,
    pub started_at_utc: DateTime<Utc>,
    pub acceptor: String,
    pub white_side_player: String,
}

/// Terminal outcome returned by every finishing command
#[derive(Debug, Clone, Serialize)]
pub struct MatchFinishedInfo {
    pub match_id: Uuid,
    pub ended_at_utc: DateTime<Utc>,
    pub winner: Option<String>,
    pub win_by: Option<String>,
    pub draw_by: Option<String>,
}

impl MatchFinishedInfo {
    pub fn from_match(chess_match: &Match) -> Self {
        Self {
            match_id: chess_match.match_id,
            ended_at_utc: chess_match.ended_at_utc.unwrap_or_else(Utc::now),
            winner: chess_match.winner.clone(),
            win_by: chess_match.win_by.map(|w| w.as_str().to_string()),
            draw_by: chess_match.draw_by.map(|d| d.as_str().to_string()),
        }
    }
}

/// A draw request either registers, or the clock race finishes the match
#[derive(Debug, Clone)]
pub enum DrawRequestOutcome {
    Requested { req_side: MatchSide },
    Finished(MatchFinishedInfo),
}

/// A draw rejection either clears the request, or the clock race wins
#[derive(Debug, Clone)]
pub enum DrawRejectOutcome {
    Rejected,
    Finished(MatchFinishedInfo),
}

/// Full read projection of a match
#[derive(Debug, Clone, Serialize)]
pub struct MatchInfo {
    pub match_id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub started_at_utc: Option<DateTime<Utc>>,
    pub ended_at_utc: Option<DateTime<Utc>>,
    pub last_move_at_utc: Option<DateTime<Utc>>,
    pub time_limit: Option<i64>,
    pub extra_time_per_move: Option<i64>,
    pub white_side_player: Option<String>,
    pub status: String,
    pub creator: String,
    pub acceptor: Option<String>,
    pub ai_level: Option<i32>,
    pub fen: Option<String>,
    pub history: Vec<String>,
    pub winner: Option<String>,
    pub win_by: Option<String>,
    pub draw_by: Option<String>,
    pub draw_requested_side: Option<MatchSide>,
    pub white_side_time_remaining: Option<i64>,
    pub black_side_time_remaining: Option<i64>,
}

impl From<&Match> for MatchInfo {
    fn from(chess_match: &Match) -> Self {
        Self {
            match_id: chess_match.match_id,
            created_at_utc: chess_match.created_at_utc,
            started_at_utc: chess_match.started_at_utc,
            ended_at_utc: chess_match.ended_at_utc,
            last_move_at_utc: chess_match.last_move_at_utc,
            time_limit: chess_match.time_limit,
            extra_time_per_move: chess_match.extra_time_per_move,
            white_side_player: chess_match.white_side_player.clone(),
            status: chess_match.status.as_str().to_string(),
            creator: chess_match.creator.clone(),
            acceptor: chess_match.acceptor.clone(),
            ai_level: chess_match.ai_level,
            fen: chess_match.board.clone(),
            history: chess_match.history.clone(),
            winner: chess_match.winner.clone(),
            win_by: chess_match.win_by.map(|w| w.as_str().to_string()),
            draw_by: chess_match.draw_by.map(|d| d.as_str().to_string()),
            draw_requested_side: chess_match.draw_requested_side,
            white_side_time_remaining: chess_match.white_side_time_remaining,
            black_side_time_remaining: chess_match.black_side_time_remaining,
        }
    }
}

// ============================================================================
// Match Core - Match Entity
// File: crates/match-core/src/domain/chess_match.rs
// ============================================================================

use chrono::{DateTime, Utc};
use match_events::MatchSide;
use match_shared::constants::DEFAULT_CHESS_POSITION;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::options::CreateMatchOptions;

/// Lifecycle status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Created,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Created => "Created",
            MatchStatus::InProgress => "InProgress",
            MatchStatus::Finished => "Finished",
        }
    }
}

/// How a decisive match was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinDescriptor {
    Mate,
    OnTime,
    Resignation,
}

impl WinDescriptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinDescriptor::Mate => "Mate",
            WinDescriptor::OnTime => "OnTime",
            WinDescriptor::Resignation => "Resignation",
        }
    }
}

/// How a drawn match was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawDescriptor {
    Agreement,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

impl DrawDescriptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawDescriptor::Agreement => "Agreement",
            DrawDescriptor::Stalemate => "Stalemate",
            DrawDescriptor::InsufficientMaterial => "InsufficientMaterial",
            DrawDescriptor::ThreefoldRepetition => "ThreefoldRepetition",
            DrawDescriptor::FiftyMoveRule => "FiftyMoveRule",
        }
    }
}

/// Canonical record of one match, from creation to a terminal outcome.
///
/// Durations are integer seconds; instants are UTC. `history` holds opaque
/// move strings, `board` an opaque position string. Finishing transitions go
/// through [`Match::finish_with_win`] / [`Match::finish_with_draw`] so the
/// record never carries a partial outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: Uuid,
    pub creator: String,
    pub acceptor: Option<String>,

    pub created_at_utc: DateTime<Utc>,
    pub started_at_utc: Option<DateTime<Utc>>,
    pub ended_at_utc: Option<DateTime<Utc>>,
    pub last_move_at_utc: Option<DateTime<Utc>>,

    pub time_limit: Option<i64>,
    pub extra_time_per_move: Option<i64>,
    pub white_side_time_remaining: Option<i64>,
    pub black_side_time_remaining: Option<i64>,

    /// Creation-time color choice: 0 = creator plays white, 1 = acceptor.
    pub first_to_act_side: Option<i32>,
    pub white_side_player: Option<String>,
    pub acting_side: Option<MatchSide>,
    pub status: MatchStatus,
    pub ai_level: Option<i32>,

    pub board: Option<String>,
    pub history: Vec<String>,

    pub winner: Option<String>,
    pub win_by: Option<WinDescriptor>,
    pub draw_by: Option<DrawDescriptor>,
    pub draw_requested_side: Option<MatchSide>,
}

impl Match {
    /// Create a new match record from validated creation options.
    pub fn new(match_id: Uuid, creator: String, options: &CreateMatchOptions) -> Self {
        Self {
            match_id,
            creator,
            acceptor: None,
            created_at_utc: Utc::now(),
            started_at_utc: None,
            ended_at_utc: None,
            last_move_at_utc: None,
            time_limit: options.time_limit,
            extra_time_per_move: options.extra_time_per_move,
            white_side_time_remaining: None,
            black_side_time_remaining: None,
            first_to_act_side: options.first_to_act_side,
            white_side_player: None,
            acting_side: None,
            status: MatchStatus::Created,
            ai_level: options.ai_level,
            board: None,
            history: Vec::new(),
            winner: None,
            win_by: None,
            draw_by: None,
            draw_requested_side: None,
        }
    }

    pub fn is_participant(&self, user: &str) -> bool {
        user == self.creator || self.acceptor.as_deref() == Some(user)
    }

    /// The participant playing the given side. None before the match starts.
    pub fn player_of(&self, side: MatchSide) -> Option<&str> {
        let white = self.white_side_player.as_deref()?;
        match side {
            MatchSide::White => Some(white),
            MatchSide::Black => {
                if white == self.creator {
                    self.acceptor.as_deref()
                } else {
                    Some(self.creator.as_str())
                }
            }
        }
    }

    /// The side the given participant plays. None for non-participants and
    /// before the match starts.
    pub fn side_of(&self, user: &str) -> Option<MatchSide> {
        let white = self.white_side_player.as_deref()?;
        if user == white {
            Some(MatchSide::White)
        } else if self.is_participant(user) {
            Some(MatchSide::Black)
        } else {
            None
        }
    }

    /// The other participant. None for non-participants.
    pub fn opponent_of(&self, user: &str) -> Option<&str> {
        if user == self.creator {
            self.acceptor.as_deref()
        } else if self.acceptor.as_deref() == Some(user) {
            Some(self.creator.as_str())
        } else {
            None
        }
    }

    pub fn remaining_time_of(&self, side: MatchSide) -> Option<i64> {
        match side {
            MatchSide::White => self.white_side_time_remaining,
            MatchSide::Black => self.black_side_time_remaining,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Transition `Created` -> `InProgress`: register the acceptor, assign
    /// the white player, reset the board, and arm both clocks if timed.
    pub fn start(&mut self, acceptor: String, white_side_player: String, now: DateTime<Utc>) {
        self.acceptor = Some(acceptor);
        self.started_at_utc = Some(now);
        self.white_side_player = Some(white_side_player);
        self.acting_side = Some(MatchSide::White);
        self.status = MatchStatus::InProgress;
        self.board = Some(DEFAULT_CHESS_POSITION.to_string());
        if let Some(limit) = self.time_limit {
            self.white_side_time_remaining = Some(limit);
            self.black_side_time_remaining = Some(limit);
        }
    }

    /// Finish decisively. Clears the acting side and any pending draw
    /// request, and sets the win pair as the single outcome.
    pub fn finish_with_win(&mut self, winner: String, win_by: WinDescriptor, now: DateTime<Utc>) {
        self.ended_at_utc = Some(now);
        self.status = MatchStatus::Finished;
        self.acting_side = None;
        self.draw_requested_side = None;
        self.draw_by = None;
        self.win_by = Some(win_by);
        self.winner = Some(winner);
    }

    /// Finish as a draw. Clears the acting side and any pending draw
    /// request, and sets the draw cause as the single outcome.
    pub fn finish_with_draw(&mut self, draw_by: DrawDescriptor, now: DateTime<Utc>) {
        self.ended_at_utc = Some(now);
        self.status = MatchStatus::Finished;
        self.acting_side = None;
        self.draw_requested_side = None;
        self.win_by = None;
        self.winner = None;
        self.draw_by = Some(draw_by);
    }
}

//! In-memory test doubles for the service ports.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use match_events::{EventPublisher, MatchEvent, PublishError};

use crate::domain::Match;
use crate::realtime::{MatchNotifier, NotifyError};
use crate::repositories::{MatchRepository, RepositoryError};

pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<Uuid, Match>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }

    /// Store a record directly, bypassing the repository contract.
    pub fn put(&self, chess_match: Match) {
        self.matches
            .lock()
            .insert(chess_match.match_id, chess_match);
    }

    pub fn stored(&self, match_id: Uuid) -> Option<Match> {
        self.matches.lock().get(&match_id).cloned()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn get_by_id(&self, match_id: Uuid) -> Result<Option<Match>, RepositoryError> {
        Ok(self.matches.lock().get(&match_id).cloned())
    }

    async fn insert(&self, chess_match: &Match) -> Result<(), RepositoryError> {
        self.matches
            .lock()
            .insert(chess_match.match_id, chess_match.clone());
        Ok(())
    }

    async fn update(&self, chess_match: &Match) -> Result<(), RepositoryError> {
        let mut matches = self.matches.lock();
        if !matches.contains_key(&chess_match.match_id) {
            return Err(RepositoryError::Database(format!(
                "match {} does not exist",
                chess_match.match_id
            )));
        }
        matches.insert(chess_match.match_id, chess_match.clone());
        Ok(())
    }

    async fn delete(&self, match_id: Uuid) -> Result<(), RepositoryError> {
        self.matches.lock().remove(&match_id);
        Ok(())
    }
}

pub struct RecordingPublisher {
    events: Mutex<Vec<MatchEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: MatchEvent) -> Result<(), PublishError> {
        self.events.lock().push(event);
        Ok(())
    }
}

pub struct RecordingNotifier {
    calls: Mutex<Vec<(Uuid, String, serde_json::Value)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Uuid, String, serde_json::Value)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MatchNotifier for RecordingNotifier {
    async fn notify(
        &self,
        room_id: Uuid,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .push((room_id, event_name.to_string(), payload));
        Ok(())
    }
}

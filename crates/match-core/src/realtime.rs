//! Realtime notifier trait (port)

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Realtime transport error: {0}")]
    Transport(String),
}

/// Push seam towards spectators and players. Rooms are keyed by match id;
/// connection and group management belong to the transport layer.
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn notify(
        &self,
        room_id: Uuid,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError>;
}

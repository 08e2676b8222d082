//! Event publisher port and the in-process broadcast bus

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

use crate::events::MatchEvent;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Event transport error: {0}")]
    Transport(String),
}

/// Outbound event seam. The match service and the sweep loop publish through
/// this; a broker-backed implementation lives with the transport layer.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: MatchEvent) -> Result<(), PublishError>;
}

/// In-process bus over a tokio broadcast channel. Used to wire the
/// expiration consumers to the match service inside one process, and by
/// tests. Publishing never blocks.
pub struct EventBus {
    tx: broadcast::Sender<MatchEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, event: MatchEvent) -> Result<(), PublishError> {
        if let Err(e) = self.tx.send(event) {
            warn!("Failed to publish event (maybe no subscribers): {}", e);
        }
        Ok(())
    }
}

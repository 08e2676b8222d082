//! Deadline consumers
//!
//! Keeps the registry in step with the event stream: every acting-side
//! handoff re-arms the deadline, every non-timeout ending clears it so no
//! stale notification fires later.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use match_events::MatchEvent;

use crate::registry::ExpirationRegistry;

pub struct DeadlineConsumer {
    registry: Arc<ExpirationRegistry>,
}

impl DeadlineConsumer {
    pub fn new(registry: Arc<ExpirationRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, event: &MatchEvent) {
        match event {
            MatchEvent::SideToActChanged {
                match_id,
                side_to_act,
                exp_time_utc,
            } => {
                self.registry.upsert(*match_id, *side_to_act, *exp_time_utc);
                debug!(
                    "Deadline for match {} armed: {} side until {}",
                    match_id,
                    side_to_act.as_str(),
                    exp_time_utc
                );
            }
            MatchEvent::MatchFinished { match_id, .. }
            | MatchEvent::MatchCancelled { match_id } => {
                if self.registry.clear(*match_id) {
                    debug!("Deadline for match {} cleared", match_id);
                }
            }
            _ => {}
        }
    }

    /// Drain an in-process bus subscription. A lagged receiver is logged and
    /// skipped; a registry rebuild covers any resulting gap.
    pub async fn run(self, mut receiver: broadcast::Receiver<MatchEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Deadline consumer lagged, {} event(s) skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

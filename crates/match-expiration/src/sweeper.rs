//! Periodic expiration sweep loop

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use match_events::{EventPublisher, MatchEvent};

use crate::registry::ExpirationRegistry;

/// Drains due deadlines from the registry and emits one `TimedOut`
/// notification per drained entry. Exactly one sweeper runs per registry.
pub struct ExpirationSweeper<P: EventPublisher> {
    registry: Arc<ExpirationRegistry>,
    publisher: Arc<P>,
    interval: Duration,
}

impl<P: EventPublisher> ExpirationSweeper<P> {
    pub fn new(registry: Arc<ExpirationRegistry>, publisher: Arc<P>, interval: Duration) -> Self {
        Self {
            registry,
            publisher,
            interval,
        }
    }

    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.sweep_once(Utc::now()).await;
        }
    }

    /// One sweep pass. A failed publish is logged and must not block the
    /// remaining notifications. The entry is not reinserted: the timeout
    /// consumer absorbs duplicates and the match record stays authoritative.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> usize {
        let due = self.registry.sweep(now);
        let count = due.len();

        for entry in due {
            if let Err(e) = self
                .publisher
                .publish(MatchEvent::TimedOut {
                    match_id: entry.match_id,
                    timed_out_side: entry.side_to_act,
                })
                .await
            {
                error!(
                    "Failed to publish timeout for match {}: {}",
                    entry.match_id, e
                );
            }
        }

        if count > 0 {
            debug!("Emitted timeout for {} match(es)", count);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use match_events::{MatchSide, PublishError};
    use parking_lot::Mutex;
    use uuid::Uuid;

    struct RecordingPublisher {
        events: Mutex<Vec<MatchEvent>>,
        fail_for: Option<Uuid>,
    }

    impl RecordingPublisher {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                fail_for: None,
            }
        }

        fn failing_for(match_id: Uuid) -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                fail_for: Some(match_id),
            }
        }

        fn events(&self) -> Vec<MatchEvent> {
            self.events.lock().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: MatchEvent) -> Result<(), PublishError> {
            if self.fail_for == Some(event.match_id()) {
                return Err(PublishError::Transport("broker unavailable".to_string()));
            }
            self.events.lock().push(event);
            Ok(())
        }
    }

    fn sweeper(
        publisher: Arc<RecordingPublisher>,
    ) -> (Arc<ExpirationSweeper<RecordingPublisher>>, Arc<ExpirationRegistry>) {
        let registry = Arc::new(ExpirationRegistry::new());
        let sweeper = Arc::new(ExpirationSweeper::new(
            registry.clone(),
            publisher,
            Duration::from_millis(50),
        ));
        (sweeper, registry)
    }

    #[tokio::test]
    async fn test_sweep_once_publishes_timeout_per_due_entry() {
        let publisher = Arc::new(RecordingPublisher::new());
        let (sweeper, registry) = sweeper(publisher.clone());

        let now = Utc::now();
        let expired_id = Uuid::new_v4();
        registry.upsert(expired_id, MatchSide::White, now - ChronoDuration::seconds(1));
        registry.upsert(Uuid::new_v4(), MatchSide::Black, now + ChronoDuration::hours(1));

        let count = sweeper.sweep_once(now).await;

        assert_eq!(count, 1);
        match &publisher.events()[..] {
            [MatchEvent::TimedOut {
                match_id,
                timed_out_side,
            }] => {
                assert_eq!(*match_id, expired_id);
                assert_eq!(*timed_out_side, MatchSide::White);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sweep_once_with_nothing_due_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::new());
        let (sweeper, registry) = sweeper(publisher.clone());
        registry.upsert(
            Uuid::new_v4(),
            MatchSide::White,
            Utc::now() + ChronoDuration::hours(1),
        );

        assert_eq!(sweeper.sweep_once(Utc::now()).await, 0);
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_block_other_entries() {
        let now = Utc::now();
        let failing_id = Uuid::new_v4();
        let ok_id = Uuid::new_v4();

        let publisher = Arc::new(RecordingPublisher::failing_for(failing_id));
        let (sweeper, registry) = sweeper(publisher.clone());
        registry.upsert(failing_id, MatchSide::White, now - ChronoDuration::seconds(2));
        registry.upsert(ok_id, MatchSide::Black, now - ChronoDuration::seconds(1));

        sweeper.sweep_once(now).await;

        // the healthy entry was still emitted, the failed one was not
        // reinserted for a second timer
        let emitted: Vec<Uuid> = publisher.events().iter().map(|e| e.match_id()).collect();
        assert_eq!(emitted, vec![ok_id]);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_run_loop_drains_registry() {
        let publisher = Arc::new(RecordingPublisher::new());
        let (sweeper, registry) = sweeper(publisher.clone());
        let match_id = Uuid::new_v4();
        registry.upsert(
            match_id,
            MatchSide::White,
            Utc::now() - ChronoDuration::seconds(1),
        );

        let handle = tokio::spawn(sweeper.run());
        for _ in 0..50 {
            if !publisher.events().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert!(publisher
            .events()
            .iter()
            .any(|e| e.match_id() == match_id));
        assert!(registry.is_empty());
    }
}

//! # Match Events
//!
//! Cross-process event contract between the match service and the
//! expiration service, plus the in-process broadcast bus used to wire
//! consumers together without an external broker.

pub mod events;
pub mod publisher;
pub mod side;

pub use events::MatchEvent;
pub use publisher::{EventBus, EventPublisher, PublishError};
pub use side::MatchSide;

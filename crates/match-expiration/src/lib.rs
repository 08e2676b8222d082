//! # Match Expiration
//!
//! Process-local deadline tracking for running match clocks: a concurrent
//! registry of "whose clock runs out when", a periodic sweep loop emitting
//! timeout notifications, and the consumer keeping the registry in sync
//! with the event stream.
//!
//! The registry is a derived cache of urgency; the match record's own
//! remaining-time fields stay authoritative. On restart it can be rebuilt
//! from the in-progress matches or the gap explicitly accepted.

pub mod consumers;
pub mod registry;
pub mod sweeper;

pub use consumers::DeadlineConsumer;
pub use registry::{ExpirationEntry, ExpirationRegistry};
pub use sweeper::ExpirationSweeper;

//! Typed, synchronous publish/subscribe channel for mode and session changes.

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventHandler, PublishReport, Subscription};
pub use types::{Event, EventKind};

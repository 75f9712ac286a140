//! Candidate-facing notifications
//!
//! The `NotificationHub` is an explicit publish/subscribe service: views
//! register a `Subscription` when they mount and unregister when they
//! unmount (or simply drop the handle). `NatsForwarder` mirrors hub traffic
//! onto NATS for out-of-process listeners.

mod hub;
pub mod messages;
mod nats;

pub use hub::{NotificationHub, SubscriberId, Subscription};
pub use messages::{Notification, NotificationLevel};
pub use nats::NatsForwarder;

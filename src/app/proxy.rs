//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;

/// A trait that abstracts the delivery of user events to whatever is
/// presenting the state. This is "fire-and-forget" and doesn't return a
/// result, simplifying its use.
///
/// The binary provides a terminal-backed implementation; tests provide one
/// backed by a channel.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

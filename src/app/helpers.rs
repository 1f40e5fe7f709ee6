//! Small shared helpers for the controller layer.

use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

/// Locks the shared [`AppState`], applies `update_fn`, and publishes the
/// resulting state as a single `StateUpdate`.
///
/// Command handlers that always end in a republish go through this so the
/// lock-mutate-notify sequence lives in one place.
pub fn with_state_and_notify<F, P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    update_fn: F,
) where
    F: FnOnce(&mut AppState),
{
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");
    update_fn(&mut state_guard);

    let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
    drop(state_guard);
    proxy.send_event(event);
}

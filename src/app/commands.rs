//! Contains the command handlers invoked by the presentation layer.
//!
//! Each function corresponds to one command accepted by
//! [`handle_command_message`](super::handle_command_message). Handlers
//! mutate the shared [`AppState`] under its lock and notify the
//! presentation layer through the [`EventProxy`]; failures go to the error
//! channel and leave state untouched.

use super::events::UserEvent;
use super::helpers::with_state_and_notify;
use super::proxy::EventProxy;
use super::state::{AppState, SearchPhase};
use super::tasks;
use super::view_model::generate_ui_state;
use crate::config;
use crate::core::{filter_results, CoreError, SearchQuery};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Handles a search request.
///
/// Empty text cancels any in-flight search and republishes the plain
/// current-directory listing. Non-empty text is answered from the result
/// cache when the cached traversal covers the current directory at the
/// configured depth; otherwise a background traversal is launched and any
/// older one is superseded.
pub fn search<P: EventProxy>(text: String, proxy: P, state: Arc<Mutex<AppState>>) {
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        with_state_and_notify(&state, &proxy, |s| {
            s.search_query.clear();
            s.cancel_current_search();
            refresh_entries(s, &proxy);
        });
        return;
    }

    let cache_event = {
        let mut state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.search_query = trimmed.clone();

        let depth = state_guard.config.max_search_depth;
        let query = SearchQuery::new(&trimmed, depth);
        let current_directory = state_guard.current_directory.clone();
        let filtered = state_guard
            .result_cache
            .get(&current_directory, depth)
            .map(|cached| filter_results(cached, &query));

        match filtered {
            Some(filtered) => {
                tracing::debug!(
                    "Cache hit for {:?} at depth {}, filtering in place",
                    current_directory,
                    depth
                );
                state_guard.search_phase = SearchPhase::Filtering;
                state_guard.listed_entries = filtered;
                state_guard.search_phase = SearchPhase::Idle;
                Some(UserEvent::StateUpdate(Box::new(generate_ui_state(
                    &state_guard,
                ))))
            }
            None => None,
        }
    };

    match cache_event {
        Some(event) => proxy.send_event(event),
        None => tasks::start_search(proxy, state),
    }
}

/// Switches the browser to a new directory.
///
/// The target is listed first; only a successful listing commits the
/// change. Failures are reported and leave the previous directory active.
pub fn change_directory<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");

    match state_guard.fs.list_children(&path) {
        Ok(children) => {
            let entries = children.into_iter().map(|e| e.path).collect();
            state_guard.enter_directory(path.clone(), entries);

            state_guard.config.last_directory = Some(path);
            if let Err(e) = config::settings::save_config(&state_guard.config, None) {
                tracing::warn!("Failed to save config after directory change: {}", e);
            }

            let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
            drop(state_guard);
            proxy.send_event(event);
        }
        Err(err) => {
            drop(state_guard);
            tracing::error!("Cannot change directory to {:?}: {}", path, err);
            proxy.send_event(UserEvent::ShowError(err.to_string()));
        }
    }
}

/// Creates a directory named `name` inside `parent` (default: the current
/// directory) and makes `parent` the active directory.
pub fn create_directory<P: EventProxy>(
    parent: Option<PathBuf>,
    name: String,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    apply_mutation(&proxy, &state, move |s| {
        let parent = parent.unwrap_or_else(|| s.current_directory.clone());
        s.fs.create_directory(&parent, &name).map(|created| {
            tracing::info!("Created directory {:?}", created);
            Some(parent)
        })
    });
}

/// Creates an empty file named `name` inside `parent` (default: the current
/// directory) and makes `parent` the active directory.
pub fn create_file<P: EventProxy>(
    parent: Option<PathBuf>,
    name: String,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    apply_mutation(&proxy, &state, move |s| {
        let parent = parent.unwrap_or_else(|| s.current_directory.clone());
        s.fs.create_file(&parent, &name).map(|created| {
            tracing::info!("Created file {:?}", created);
            Some(parent)
        })
    });
}

/// Deletes a file or an empty directory.
pub fn delete_entry<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    apply_mutation(&proxy, &state, move |s| {
        s.fs.delete(&path).map(|()| {
            tracing::info!("Deleted {:?}", path);
            None
        })
    });
}

/// Renames a file or directory within its parent.
pub fn rename_entry<P: EventProxy>(
    path: PathBuf,
    new_name: String,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    apply_mutation(&proxy, &state, move |s| {
        s.fs.rename(&path, &new_name).map(|renamed| {
            tracing::info!("Renamed {:?} to {:?}", path, renamed);
            None
        })
    });
}

/// Re-lists the current directory and republishes it.
pub fn refresh<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| refresh_entries(s, &proxy));
}

/// Runs a mutating filesystem operation under the state lock.
///
/// On success the result cache is invalidated (and any in-flight traversal
/// superseded, since it may straddle the mutation), the returned directory
/// is adopted as current when one is given, and the listing is refreshed.
/// On failure the error is reported and every piece of prior state is kept.
fn apply_mutation<P, F>(proxy: &P, state: &Arc<Mutex<AppState>>, operation: F)
where
    P: EventProxy,
    F: FnOnce(&mut AppState) -> Result<Option<PathBuf>, CoreError>,
{
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");

    match operation(&mut state_guard) {
        Ok(adopted_directory) => {
            state_guard.cancel_current_search();
            state_guard.result_cache.invalidate();
            if let Some(directory) = adopted_directory {
                state_guard.current_directory = directory;
            }
            refresh_entries(&mut state_guard, proxy);

            let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
            drop(state_guard);
            proxy.send_event(event);
        }
        Err(err) => {
            drop(state_guard);
            tracing::error!("Operation failed: {}", err);
            proxy.send_event(UserEvent::ShowError(err.to_string()));
        }
    }
}

/// Re-lists the current directory into the published entry sequence.
///
/// On failure the previous entries are kept and the error is surfaced, so
/// an unreadable directory never silently empties the display.
fn refresh_entries<P: EventProxy>(state: &mut AppState, proxy: &P) {
    match state.fs.list_children(&state.current_directory) {
        Ok(children) => {
            state.listed_entries = children.into_iter().map(|e| e.path).collect();
        }
        Err(err) => {
            tracing::error!("Failed to list {:?}: {}", state.current_directory, err);
            proxy.send_event(UserEvent::ShowError(err.to_string()));
        }
    }
}

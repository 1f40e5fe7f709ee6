//! Background execution of full-depth traversals.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::{AppState, SearchPhase};
use super::view_model::generate_ui_state;
use crate::core::{filter_results, CoreError, SearchEngine, SearchQuery};

/// Launches the background traversal that backs a cache-missing search.
///
/// Everything the worker needs (the filesystem handle, the directory, the
/// query text, and the depth) is snapshotted under the lock before the
/// task starts; the worker never reads controller state while it runs. Any
/// previously running search is superseded before the launch. On completion
/// the worker republishes only if it is still the newest search: the cache
/// is populated with the unfiltered traversal, the query predicate is
/// applied, and a single `StateUpdate` goes out.
pub fn start_search<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");

    let (cancel_flag, generation) = state_guard.begin_search();
    let fs = state_guard.fs.clone();
    let root = state_guard.current_directory.clone();
    let depth = state_guard.config.max_search_depth;
    let query_text = state_guard.search_query.clone();

    tracing::info!(
        "Starting search for \"{}\" over {:?} at depth {}",
        query_text,
        root,
        depth
    );

    let task_state = state.clone();
    let task_proxy = proxy.clone();
    let worker_flag = cancel_flag.clone();

    let handle = tokio::spawn(async move {
        let engine = SearchEngine::new(fs);
        let traversal = SearchQuery::match_all(depth);
        let search_root = root.clone();
        let blocking_flag = worker_flag.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            engine.search(&search_root, &traversal, &blocking_flag)
        })
        .await;

        let results = match outcome {
            Ok(Ok(results)) => Some(results),
            Ok(Err(CoreError::Cancelled)) => {
                tracing::debug!("Search over {:?} was superseded", root);
                return;
            }
            Ok(Err(err)) => {
                tracing::error!("Search over {:?} failed: {}", root, err);
                None
            }
            Err(join_err) => {
                tracing::error!("Search task for {:?} did not complete: {}", root, join_err);
                None
            }
        };

        let mut state_guard = task_state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");

        if !state_guard.is_current_search(generation) || worker_flag.load(Ordering::Relaxed) {
            tracing::debug!("Discarding results of a superseded search over {:?}", root);
            return;
        }

        let Some(results) = results else {
            // Failed while still current: fall back to idle so the display
            // is not stuck on a search that will never finish.
            state_guard.search_phase = SearchPhase::Idle;
            state_guard.search_task = None;
            let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
            drop(state_guard);
            task_proxy.send_event(event);
            return;
        };

        tracing::info!("Search over {:?} found {} entries", root, results.len());

        let query = SearchQuery::new(&query_text, depth);
        state_guard.result_cache.put(root, depth, results.clone());
        state_guard.search_phase = SearchPhase::Filtering;
        state_guard.listed_entries = filter_results(&results, &query);
        state_guard.search_phase = SearchPhase::Idle;
        state_guard.search_task = None;

        let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
        drop(state_guard);
        task_proxy.send_event(event);
    });

    state_guard.search_task = Some(handle);
    let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
    drop(state_guard);
    proxy.send_event(event);
}

//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module prepares data specifically for consumption by the
//! presentation layer: the published entry sequence as display strings plus
//! a few status properties.

use serde::Serialize;

use super::state::{AppState, SearchPhase};

/// A serializable snapshot of the application state for the presentation layer.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub current_directory: String,
    pub entries: Vec<String>,
    pub entry_count: usize,
    pub is_searching: bool,
    pub search_query: String,
    pub status_message: String,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let entries: Vec<String> = state
        .listed_entries
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    let status_message = match state.search_phase {
        SearchPhase::Searching => format!("Searching for \"{}\"...", state.search_query),
        _ if state.search_query.is_empty() => format!("{} entries", entries.len()),
        _ => format!("{} matches for \"{}\"", entries.len(), state.search_query),
    };

    UiState {
        current_directory: state.current_directory.display().to_string(),
        entry_count: entries.len(),
        entries,
        is_searching: state.search_phase == SearchPhase::Searching,
        search_query: state.search_query.clone(),
        status_message,
    }
}

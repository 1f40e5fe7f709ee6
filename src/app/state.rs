//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::{FileSystemAccess, OsFileSystem, ResultCache};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Where the controller currently is in the search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No search activity.
    Idle,
    /// A background traversal is running.
    Searching,
    /// A cached or freshly completed result set is being filtered on the
    /// interactive thread.
    Filtering,
    /// A superseded search has been told to stop; its eventual completion
    /// will be discarded.
    Cancelling,
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` to allow for safe, shared
/// access from the interactive thread and the background search task.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// The filesystem capability every operation goes through.
    pub fs: Arc<dyn FileSystemAccess>,
    /// The absolute path of the directory currently being browsed.
    pub current_directory: PathBuf,
    /// The entry sequence currently published to the presentation layer.
    pub listed_entries: Vec<PathBuf>,
    /// The search text as last entered by the user.
    pub search_query: String,
    /// The controller's position in the search lifecycle.
    pub search_phase: SearchPhase,
    /// Unfiltered results of the most recent completed traversal.
    pub result_cache: ResultCache,
    /// A handle to the in-flight search task, allowing it to be aborted.
    pub search_task: Option<JoinHandle<()>>,
    /// A flag used to signal cancellation to the in-flight search.
    pub search_cancel_flag: Arc<AtomicBool>,
    /// Monotonically increasing id stamped onto every launched search; a
    /// completion whose id no longer matches has been superseded.
    pub search_generation: u64,
}

impl Default for AppState {
    /// Creates a default `AppState` instance, loading the configuration from disk.
    fn default() -> Self {
        Self {
            config: AppConfig::load().unwrap_or_default(),
            fs: Arc::new(OsFileSystem),
            current_directory: PathBuf::new(),
            listed_entries: Vec::new(),
            search_query: String::new(),
            search_phase: SearchPhase::Idle,
            result_cache: ResultCache::default(),
            search_task: None,
            search_cancel_flag: Arc::new(AtomicBool::new(false)),
            search_generation: 0,
        }
    }
}

impl AppState {
    /// Cancels the in-flight search task, if any.
    ///
    /// The flag is stored before the handle is aborted so a worker that
    /// outlives the abort still observes the cancellation at its next
    /// directory boundary.
    pub fn cancel_current_search(&mut self) {
        if let Some(handle) = self.search_task.take() {
            tracing::info!("Cancelling in-flight search");
            self.search_phase = SearchPhase::Cancelling;
            self.search_cancel_flag.store(true, Ordering::SeqCst);
            handle.abort();
        }
        self.search_phase = SearchPhase::Idle;
    }

    /// Prepares a fresh search launch: supersedes any running search, arms a
    /// new cancellation flag, and advances the generation. Returns the flag
    /// and the generation the worker must carry.
    pub fn begin_search(&mut self) -> (Arc<AtomicBool>, u64) {
        self.cancel_current_search();
        let flag = Arc::new(AtomicBool::new(false));
        self.search_cancel_flag = flag.clone();
        self.search_generation += 1;
        self.search_phase = SearchPhase::Searching;
        (flag, self.search_generation)
    }

    /// `true` when a completion stamped with `generation` still belongs to
    /// the newest search and may publish its results.
    pub fn is_current_search(&self, generation: u64) -> bool {
        self.search_generation == generation && self.search_phase == SearchPhase::Searching
    }

    /// Switches to a new working directory, dropping everything derived
    /// from the old one.
    pub fn enter_directory(&mut self, directory: PathBuf, entries: Vec<PathBuf>) {
        self.cancel_current_search();
        self.result_cache.invalidate();
        self.search_query.clear();
        self.current_directory = directory;
        self.listed_entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState {
            config: AppConfig::default(),
            ..AppState::default()
        }
    }

    #[test]
    fn begin_search_advances_the_generation_and_arms_a_fresh_flag() {
        let mut state = test_state();
        let (first_flag, first_gen) = state.begin_search();
        let (second_flag, second_gen) = state.begin_search();

        assert!(second_gen > first_gen);
        assert!(!second_flag.load(Ordering::SeqCst));
        assert!(!Arc::ptr_eq(&first_flag, &second_flag));
    }

    #[test]
    fn completions_from_older_generations_are_not_current() {
        let mut state = test_state();
        let (_, old_gen) = state.begin_search();
        let (_, new_gen) = state.begin_search();

        assert!(!state.is_current_search(old_gen));
        assert!(state.is_current_search(new_gen));
    }

    #[test]
    fn entering_a_directory_resets_search_state() {
        let mut state = test_state();
        state.search_query = "old".to_string();
        state
            .result_cache
            .put(PathBuf::from("/old"), 3, vec![PathBuf::from("/old/a")]);

        state.enter_directory(PathBuf::from("/new"), vec![PathBuf::from("/new/b")]);

        assert_eq!(state.current_directory, PathBuf::from("/new"));
        assert!(state.search_query.is_empty());
        assert!(state.result_cache.get(std::path::Path::new("/old"), 3).is_none());
        assert_eq!(state.search_phase, SearchPhase::Idle);
    }
}

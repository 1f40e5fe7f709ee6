//! Bounded-depth recursive filename search over the filesystem capability.

use super::{CoreError, FileSystemAccess, SearchQuery};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Walks a directory tree and collects entries whose base name matches a
/// [`SearchQuery`].
pub struct SearchEngine {
    fs: Arc<dyn FileSystemAccess>,
}

impl SearchEngine {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// Runs a depth-first pre-order traversal starting at `root`.
    ///
    /// Every child whose base name matches the query is appended in
    /// traversal order; child directories are entered immediately after
    /// their own match check while remaining depth is positive, so a depth
    /// of 0 inspects only the immediate children of `root`.
    ///
    /// The cancellation flag is checked once per directory entered. Once it
    /// is observed the traversal stops with [`CoreError::Cancelled`] and
    /// the partial results are discarded. A directory that fails to list is
    /// skipped with a warning so one unreadable branch cannot lose matches
    /// from its siblings.
    pub fn search(
        &self,
        root: &Path,
        query: &SearchQuery,
        cancel_flag: &AtomicBool,
    ) -> Result<Vec<PathBuf>, CoreError> {
        let mut results = Vec::new();
        self.search_tree(root, query, query.max_depth(), cancel_flag, &mut results)?;
        Ok(results)
    }

    fn search_tree(
        &self,
        directory: &Path,
        query: &SearchQuery,
        remaining_depth: usize,
        cancel_flag: &AtomicBool,
        results: &mut Vec<PathBuf>,
    ) -> Result<(), CoreError> {
        if cancel_flag.load(Ordering::Relaxed) {
            return Err(CoreError::Cancelled);
        }

        let children = match self.fs.list_children(directory) {
            Ok(children) => children,
            Err(err) => {
                tracing::warn!("Skipping unreadable directory {:?}: {}", directory, err);
                return Ok(());
            }
        };

        for child in children {
            let name = child
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("");
            if query.matches(name) {
                results.push(child.path.clone());
            }
            if child.is_directory && remaining_depth > 0 {
                self.search_tree(&child.path, query, remaining_depth - 1, cancel_flag, results)?;
            }
        }

        Ok(())
    }
}

/// Applies the traversal's base-name predicate to an already-collected
/// result set, preserving order. Cheap enough to run synchronously on the
/// interactive thread.
pub fn filter_results(results: &[PathBuf], query: &SearchQuery) -> Vec<PathBuf> {
    results
        .par_iter()
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            query.matches(name)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FsEntry;
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// An in-memory directory tree with optional per-path access denial and
    /// an optional hook run on every listing.
    struct MockFileSystem {
        dirs: HashMap<PathBuf, Vec<FsEntry>>,
        denied: HashSet<PathBuf>,
        on_list: Mutex<Option<Box<dyn FnMut(&Path) + Send>>>,
    }

    impl MockFileSystem {
        fn new() -> Self {
            Self {
                dirs: HashMap::new(),
                denied: HashSet::new(),
                on_list: Mutex::new(None),
            }
        }

        fn dir(mut self, path: &str, children: &[(&str, bool)]) -> Self {
            let entries = children
                .iter()
                .map(|(child, is_directory)| FsEntry {
                    path: PathBuf::from(path).join(child),
                    is_directory: *is_directory,
                })
                .collect();
            self.dirs.insert(PathBuf::from(path), entries);
            self
        }

        fn deny(mut self, path: &str) -> Self {
            self.denied.insert(PathBuf::from(path));
            self
        }

        fn with_list_hook(self, hook: impl FnMut(&Path) + Send + 'static) -> Self {
            *self.on_list.lock().unwrap() = Some(Box::new(hook));
            self
        }
    }

    impl FileSystemAccess for MockFileSystem {
        fn list_children(&self, directory: &Path) -> Result<Vec<FsEntry>, CoreError> {
            if let Some(hook) = self.on_list.lock().unwrap().as_mut() {
                hook(directory);
            }
            if self.denied.contains(directory) {
                return Err(CoreError::AccessDenied(directory.to_path_buf()));
            }
            self.dirs
                .get(directory)
                .cloned()
                .ok_or_else(|| CoreError::NotFound(directory.to_path_buf()))
        }

        fn create_directory(&self, _parent: &Path, _name: &str) -> Result<PathBuf, CoreError> {
            unimplemented!("mock is read-only")
        }

        fn create_file(&self, _parent: &Path, _name: &str) -> Result<PathBuf, CoreError> {
            unimplemented!("mock is read-only")
        }

        fn delete(&self, _path: &Path) -> Result<(), CoreError> {
            unimplemented!("mock is read-only")
        }

        fn rename(&self, _path: &Path, _new_name: &str) -> Result<PathBuf, CoreError> {
            unimplemented!("mock is read-only")
        }
    }

    fn engine(fs: MockFileSystem) -> SearchEngine {
        SearchEngine::new(Arc::new(fs))
    }

    fn paths(raw: &[&str]) -> Vec<PathBuf> {
        raw.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn matches_are_case_insensitive_and_skip_denied_branches() {
        let fs = MockFileSystem::new()
            .dir(
                "/root",
                &[("Alpha.txt", false), ("sub", true), ("sub2", true)],
            )
            .dir("/root/sub", &[("beta_ALPHA.md", false)])
            .deny("/root/sub2");

        let query = SearchQuery::new("alpha", 2);
        let cancel = AtomicBool::new(false);
        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();

        assert_eq!(results, paths(&["/root/Alpha.txt", "/root/sub/beta_ALPHA.md"]));
    }

    #[test]
    fn depth_zero_inspects_only_immediate_children() {
        let fs = MockFileSystem::new()
            .dir("/root", &[("alpha1.txt", false), ("alpha_dir", true)])
            .dir("/root/alpha_dir", &[("alpha2.txt", false)]);

        let query = SearchQuery::new("alpha", 0);
        let cancel = AtomicBool::new(false);
        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();

        // The matching directory itself is reported, but never entered.
        assert_eq!(results, paths(&["/root/alpha1.txt", "/root/alpha_dir"]));
    }

    #[test]
    fn depth_bound_is_exact() {
        let fs = MockFileSystem::new()
            .dir("/root", &[("level1", true)])
            .dir("/root/level1", &[("hit_one.txt", false), ("level2", true)])
            .dir("/root/level1/level2", &[("hit_two.txt", false)]);

        let query = SearchQuery::new("hit", 1);
        let cancel = AtomicBool::new(false);
        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();

        // Depth 1 descends into level1 but stops before level2's children.
        assert_eq!(results, paths(&["/root/level1/hit_one.txt"]));
    }

    #[test]
    fn traversal_is_pre_order_with_subtrees_inline() {
        let fs = MockFileSystem::new()
            .dir(
                "/root",
                &[("a_match.txt", false), ("match_dir", true), ("z_match.txt", false)],
            )
            .dir("/root/match_dir", &[("inner_match.txt", false)]);

        let query = SearchQuery::new("match", 3);
        let cancel = AtomicBool::new(false);
        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();

        assert_eq!(
            results,
            paths(&[
                "/root/a_match.txt",
                "/root/match_dir",
                "/root/match_dir/inner_match.txt",
                "/root/z_match.txt",
            ])
        );
    }

    #[test]
    fn empty_query_matches_every_entry_within_the_bound() {
        let fs = MockFileSystem::new()
            .dir("/root", &[("one.txt", false), ("sub", true)])
            .dir("/root/sub", &[("two.txt", false)]);

        let query = SearchQuery::match_all(5);
        let cancel = AtomicBool::new(false);
        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();

        let as_set: HashSet<_> = results.into_iter().collect();
        let expected: HashSet<_> = paths(&["/root/one.txt", "/root/sub", "/root/sub/two.txt"])
            .into_iter()
            .collect();
        assert_eq!(as_set, expected);
    }

    #[test]
    fn repeated_searches_yield_identical_sequences() {
        let fs = MockFileSystem::new()
            .dir("/root", &[("report.txt", false), ("sub", true)])
            .dir("/root/sub", &[("report_old.txt", false)]);
        let engine = engine(fs);

        let query = SearchQuery::new("report", 2);
        let cancel = AtomicBool::new(false);
        let first = engine.search(Path::new("/root"), &query, &cancel).unwrap();
        let second = engine.search(Path::new("/root"), &query, &cancel).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pre_set_cancellation_terminates_immediately() {
        let fs = MockFileSystem::new().dir("/root", &[("match.txt", false)]);
        let query = SearchQuery::new("match", 1);
        let cancel = AtomicBool::new(true);

        let err = engine(fs)
            .search(Path::new("/root"), &query, &cancel)
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn cancellation_observed_mid_traversal_discards_partial_results() {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_in_hook = cancel.clone();

        let fs = MockFileSystem::new()
            .dir("/root", &[("early_match.txt", false), ("sub", true)])
            .dir("/root/sub", &[("late_match.txt", false)])
            .with_list_hook(move |directory: &Path| {
                // Flip the flag while the root listing is being processed;
                // the check at the next directory boundary must observe it.
                if directory == Path::new("/root") {
                    cancel_in_hook.store(true, Ordering::SeqCst);
                }
            });

        let query = SearchQuery::new("match", 2);
        let err = engine(fs)
            .search(Path::new("/root"), &query, &cancel)
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn unreadable_root_yields_an_empty_result() {
        let fs = MockFileSystem::new().deny("/root");
        let query = SearchQuery::new("anything", 3);
        let cancel = AtomicBool::new(false);

        let results = engine(fs).search(Path::new("/root"), &query, &cancel).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn filter_results_keeps_matching_subsequence_in_order() {
        let results = paths(&[
            "/root/Alpha.txt",
            "/root/beta.txt",
            "/root/sub/gamma_alpha.md",
        ]);
        let filtered = filter_results(&results, &SearchQuery::new("ALPHA", 2));
        assert_eq!(
            filtered,
            paths(&["/root/Alpha.txt", "/root/sub/gamma_alpha.md"])
        );
    }
}

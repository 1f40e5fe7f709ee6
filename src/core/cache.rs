//! Caches the result set of the most recent full-depth traversal.

use std::path::{Path, PathBuf};

/// Holds the unfiltered results of the last completed traversal, keyed by
/// the directory it ran over and the depth bound it used.
///
/// A lookup hits only when both key components match exactly; anything else
/// is a miss. The owner is responsible for calling [`ResultCache::invalidate`]
/// whenever the active directory changes or a mutation succeeds, since the
/// cached set is only guaranteed to equal a fresh traversal at the moment it
/// was populated.
#[derive(Debug, Default)]
pub struct ResultCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    source_directory: PathBuf,
    depth_used: usize,
    results: Vec<PathBuf>,
}

impl ResultCache {
    pub fn get(&self, directory: &Path, depth: usize) -> Option<&[PathBuf]> {
        self.entry
            .as_ref()
            .filter(|e| e.source_directory == directory && e.depth_used == depth)
            .map(|e| e.results.as_slice())
    }

    pub fn put(&mut self, directory: PathBuf, depth: usize, results: Vec<PathBuf>) {
        self.entry = Some(CacheEntry {
            source_directory: directory,
            depth_used: depth,
            results,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

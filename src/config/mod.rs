pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How many levels below the immediate children a search may descend.
const DEFAULT_SEARCH_DEPTH: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// The directory that was active when the application last ran.
    pub last_directory: Option<PathBuf>,
    /// Depth bound applied to every recursive search.
    pub max_search_depth: usize,
    /// Whether to reopen `last_directory` on startup instead of the home
    /// directory.
    pub auto_load_last_directory: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_directory: None,
            max_search_depth: DEFAULT_SEARCH_DEPTH,
            auto_load_last_directory: true,
        }
    }
}

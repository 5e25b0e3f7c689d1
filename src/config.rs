//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a snapp.toml, and if present we load settings from there.
//! This provides the notebook location, search snippet sizing and the log file.

use crate::search::SnippetOptions;
use facet::Facet;
use std::fs;

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "snapp.toml";

#[derive(Facet, Clone)]
/// User preferences loaded from snapp.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "snapp-notes.json".to_string())]
    /// JSON file the notebook is stored in.
    pub store_path: String,
    #[facet(default = 80)]
    /// Maximum visible characters in a search snippet.
    pub snippet_budget: usize,
    #[facet(default = 50)]
    /// Context wanted either side of a search match.
    pub snippet_context: usize,
    #[facet(default = String::new())]
    /// File to write logs to; empty disables file logging.
    pub log_file: String,
}

impl Config {
    #[must_use]
    /// Load configuration from snapp.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string(CONFIG_FILE) {
            if let Some(config) = Self::parse(&contents) {
                return config;
            }
        }
        Self::parse("").unwrap()
    }

    #[must_use]
    /// Parse configuration text, filling unset fields with defaults.
    pub fn parse(contents: &str) -> Option<Self> {
        facet_toml::from_str::<Self>(contents).ok()
    }

    #[must_use]
    /// Snippet sizing for the search view.
    pub fn snippet_options(&self) -> SnippetOptions {
        SnippetOptions {
            budget: self.snippet_budget,
            context: self.snippet_context,
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;

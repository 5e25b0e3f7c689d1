//! snapp: Markdown notes in three panes, with a heading outline that follows the editor.
//!
//! The library holds everything below the terminal event loop: heading extraction, search
//! helpers, the note tree, persistence and the application state the UI renders.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod heading;
pub mod navigation;
pub mod note;
pub mod outline;
pub mod search;
pub mod shortcuts;
pub mod store;
pub mod tree;
pub mod ui;

//! TUI Gems (workspace facade crate).
//!
//! Re-exports the workspace crates under `tui_gems::{core,input,term,types}`
//! and holds the terminal runner's session and argument handling.

pub use tui_gems_core as core;
pub use tui_gems_input as input;
pub use tui_gems_term as term;
pub use tui_gems_types as types;

pub mod app;
pub mod cli;

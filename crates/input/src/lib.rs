//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key and mouse events into [`crate::types::InputAction`]
//! and provides a DAS/ARR cursor handler suitable for terminal environments
//! (including terminals without key-release events).

pub mod handler;
pub mod map;

pub use tui_gems_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, handle_mouse_event, key_direction, should_quit};

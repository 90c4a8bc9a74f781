//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout frameworks and instead renders into a simple
//! framebuffer that can be flushed to a terminal backend.
//!
//! - `core` stays deterministic and testable
//! - Animations are drawn from the snapshot's descriptors at sub-cell column
//!   resolution (2 chars wide per cell)
//! - Mouse clicks map back to board cells through the same layout

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_gems_core as core;
pub use tui_gems_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{gem_color, gem_glyph, AnchorY, GameView, HudView, Viewport};
pub use renderer::{FrameEncoder, Run, TerminalRenderer};

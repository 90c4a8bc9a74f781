//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the board rules, the match engine and its timing.
//! It has no dependencies on terminal, input, or I/O beyond loading a
//! settings file, so it is:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: The gem source is a trait, so refills can be scripted
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: NxN gem grid and the pure algorithms (generate, match, drop, refill, move check)
//! - [`game_state`]: Selection, processing lock and the swap/cascade phase machine
//! - [`animation`]: Per-gem animation descriptors and easing
//! - [`settings`]: Difficulty and speed settings, JSON loading
//! - [`rng`]: Seeded gem generation
//! - [`scoring`]: Points per resolution round
//! - [`snapshot`]: Read-only frame state for renderers
//!
//! # Game Rules
//!
//! - **Matches**: Three or more equal gems in a straight row or column
//! - **Swaps**: Only adjacent cells; a swap that makes no match is undone
//! - **Cascades**: Cleared gems are replaced from above and re-checked until
//!   the board is still
//! - **Scoring**: 10 points per cleared gem, every round of a cascade
//! - **Game over**: No single swap can make a match
//!
//! # Example
//!
//! ```
//! use tui_gems_core::{GameState, Settings};
//! use tui_gems_core::types::TICK_MS;
//!
//! let mut game = GameState::new(Settings::default(), 12345);
//!
//! // Select a gem, then a neighbour to swap with it.
//! game.handle_cell_interaction(0, 0);
//! game.handle_cell_interaction(0, 1);
//! assert!(game.is_processing());
//!
//! while game.is_processing() {
//!     game.tick(TICK_MS);
//! }
//! assert!(game.snapshot().accepts_input() || game.game_over());
//! ```
//!
//! # Timing
//!
//! The game uses a fixed timestep: call
//! [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time (16ms at ~60 FPS). Each phase lasts its full duration.

pub mod animation;
pub mod board;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod settings;
pub mod snapshot;

pub use tui_gems_types as types;

// Re-export commonly used types for convenience
pub use animation::{Animation, AnimationKind};
pub use board::{Board, FallMove, MatchSet};
pub use game_state::{EngineEvent, GameState, Phase};
pub use rng::{GemSource, SimpleRng};
pub use scoring::calculate_match_score;
pub use settings::{PhaseTiming, Settings, SettingsError};
pub use snapshot::GameSnapshot;

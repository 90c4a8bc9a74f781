//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data, usable in any context (core logic, terminal
//! rendering, input mapping).
//!
//! # Board Dimensions
//!
//! - **Default size**: 8x8 cells
//! - **Accepted sizes**: 3x3 up to 16x16 (square boards only)
//! - Coordinates are `(row, col)`; row 0 is the top, gravity pulls toward
//!   increasing row index.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `BASE_SWAP_MS` | 200 | Swap animation at speed 3 |
//! | `BASE_DISAPPEAR_MS` | 300 | Disappear animation at speed 3 |
//! | `BASE_FALL_MS` | 200 | Fall animation at speed 3 |
//!
//! Speed settings 1..=5 scale the base durations by [`SPEED_PERCENT`].
//! The swap animation follows the disappear speed dial.
//!
//! # Difficulty
//!
//! | Difficulty | Gem types |
//! |------------|-----------|
//! | 1 (easy) | 5 |
//! | 2 (normal) | 6 |
//! | 3 (hard) | 7 |
//!
//! More gem types means fewer incidental matches and fewer available moves.
//!
//! # Examples
//!
//! ```
//! use tui_gems_types::{Pos, gem_types_for_difficulty, BOARD_SIZE};
//!
//! let a = Pos::new(3, 1);
//! let b = Pos::new(3, 2);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Pos::new(4, 2)));
//!
//! assert_eq!(gem_types_for_difficulty(1), Some(5));
//! assert_eq!(BOARD_SIZE, 8);
//! ```

use serde::{Deserialize, Serialize};

/// Default board edge length
pub const BOARD_SIZE: u8 = 8;

/// Smallest board edge that can hold a run of three
pub const MIN_BOARD_SIZE: u8 = 3;

/// Largest supported board edge
pub const MAX_BOARD_SIZE: u8 = 16;

/// Minimum run length that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Points awarded per matched gem
pub const MATCH_BONUS: u32 = 10;

/// Fixed timestep interval (~60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation duration at normal speed
pub const BASE_SWAP_MS: u32 = 200;

/// Disappear animation duration at normal speed
pub const BASE_DISAPPEAR_MS: u32 = 300;

/// Fall animation duration at normal speed
pub const BASE_FALL_MS: u32 = 200;

/// Duration multipliers (percent) for speed settings 1..=5
///
/// Index 0 = speed 1 (very slow), index 4 = speed 5 (very fast).
pub const SPEED_PERCENT: [u32; 5] = [250, 180, 100, 60, 30];

/// Slowest selectable animation speed
pub const MIN_SPEED: u8 = 1;

/// Fastest selectable animation speed
pub const MAX_SPEED: u8 = 5;

/// Speed used when nothing else is configured
pub const DEFAULT_SPEED: u8 = 3;

/// Gem type count by difficulty (index 0 = difficulty 1)
pub const GEM_TYPES_BY_DIFFICULTY: [u8; 3] = [5, 6, 7];

/// Highest gem type count any difficulty uses
pub const MAX_GEM_TYPES: u8 = 7;

/// Difficulty used when nothing else is configured
pub const DEFAULT_DIFFICULTY: u8 = 2;

/// Cascade depth above which the engine logs a warning
pub const CASCADE_WARN_DEPTH: u32 = 32;

/// Cursor auto-repeat timing (milliseconds)
pub const CURSOR_DAS_MS: u32 = 170;
pub const CURSOR_ARR_MS: u32 = 60;

/// Gem type identifier, `0 <= gem < type_count`
pub type Gem = u8;

/// A cell on the board
///
/// - `None`: empty (only observable mid-cascade)
/// - `Some(gem)`: occupied by the given gem type
pub type Cell = Option<Gem>;

/// Scale a base duration by a speed setting.
///
/// Out-of-range speeds are clamped into `1..=5`.
///
/// ```
/// use tui_gems_types::{scaled_duration_ms, BASE_FALL_MS};
///
/// assert_eq!(scaled_duration_ms(BASE_FALL_MS, 3), 200);
/// assert_eq!(scaled_duration_ms(BASE_FALL_MS, 1), 500);
/// assert_eq!(scaled_duration_ms(BASE_FALL_MS, 5), 60);
/// ```
pub fn scaled_duration_ms(base_ms: u32, speed: u8) -> u32 {
    let idx = speed.clamp(MIN_SPEED, MAX_SPEED) as usize - 1;
    base_ms * SPEED_PERCENT[idx] / 100
}

/// Gem type count for a difficulty level, `None` outside `1..=3`
pub fn gem_types_for_difficulty(difficulty: u8) -> Option<u8> {
    match difficulty {
        1..=3 => Some(GEM_TYPES_BY_DIFFICULTY[difficulty as usize - 1]),
        _ => None,
    }
}

/// A board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan adjacency: exactly one axis differs, by exactly one.
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }

    /// Step one cell in a direction, staying inside a `size`x`size` board.
    pub fn step(self, dir: Direction, size: u8) -> Pos {
        match dir {
            Direction::Up => Pos::new(self.row.saturating_sub(1), self.col),
            Direction::Down => Pos::new((self.row + 1).min(size.saturating_sub(1)), self.col),
            Direction::Left => Pos::new(self.row, self.col.saturating_sub(1)),
            Direction::Right => Pos::new(self.row, (self.col + 1).min(size.saturating_sub(1))),
        }
    }
}

/// Cursor movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Player actions produced by the input layer
///
/// Cell interaction is expressed as [`InputAction::Activate`] (at the cursor)
/// or [`InputAction::Click`] (at an explicit cell, e.g. from a mouse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move the keyboard cursor one cell
    Move(Direction),
    /// Interact with the cell under the cursor
    Activate,
    /// Interact with a specific cell
    Click(Pos),
    /// Choose difficulty (1..=3) for the next restart
    Difficulty(u8),
    /// Restart the game (allowed at any time)
    Restart,
}

//! Cursor auto-repeat (DAS/ARR) for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::map::key_direction;
use crate::types::{Direction, InputAction, CURSOR_ARR_MS, CURSOR_DAS_MS};

// Without key-release events a short timeout stops a single tap from
// turning into a held key that keeps repeating.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks the held cursor key for DAS/ARR repeats.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: Option<Direction>,
    /// Time since the last press event for the held key.
    since_key_ms: u32,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(CURSOR_DAS_MS, CURSOR_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            held: None,
            since_key_ms: 0,
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// The cursor key currently held, if any.
    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Register a key press. Returns the immediate move for a newly pressed
    /// direction; terminal auto-repeat presses of the held key only refresh
    /// the release timeout.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<InputAction> {
        let dir = key_direction(code)?;
        self.since_key_ms = 0;
        if self.held == Some(dir) {
            return None;
        }
        self.held = Some(dir);
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(InputAction::Move(dir))
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if key_direction(code).is_some_and(|dir| self.held == Some(dir)) {
            self.release();
        }
    }

    /// Advance timers, returning the repeat moves that came due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<InputAction, 32> {
        let mut actions = ArrayVec::<InputAction, 32>::new();

        self.since_key_ms = self.since_key_ms.saturating_add(elapsed_ms);
        if self.since_key_ms > self.key_release_timeout_ms {
            self.release();
        }

        let Some(dir) = self.held else {
            return actions;
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator += excess;

            while self.arr_accumulator >= self.arr_rate {
                let _ = actions.try_push(InputAction::Move(dir));
                self.arr_accumulator -= self.arr_rate;
            }
        }

        actions
    }

    fn release(&mut self) {
        self.held = None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    pub fn reset(&mut self) {
        self.release();
        self.since_key_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

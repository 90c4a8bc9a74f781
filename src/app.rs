//! Frontend session: the game plus the state only the terminal UI needs.
//!
//! Keeps the keyboard cursor and the difficulty chosen for the next restart,
//! and turns [`InputAction`]s into engine commands.

use tracing::debug;

use crate::core::{EngineEvent, GameSnapshot, GameState, Settings};
use crate::term::HudView;
use crate::types::{InputAction, Pos};

pub struct App {
    game: GameState,
    cursor: Pos,
    next_difficulty: u8,
}

impl App {
    pub fn new(settings: Settings, seed: u32) -> Self {
        Self {
            game: GameState::new(settings, seed),
            cursor: Pos::new(0, 0),
            next_difficulty: settings.difficulty,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn next_difficulty(&self) -> u8 {
        self.next_difficulty
    }

    pub fn hud(&self) -> HudView {
        HudView {
            cursor: Some(self.cursor),
            next_difficulty: Some(self.next_difficulty),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.game.snapshot_into(out);
    }

    /// Apply one player action. Returns `true` if it dispatched a matching swap.
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Move(dir) => {
                self.cursor = self.cursor.step(dir, self.game.board().size());
                false
            }
            InputAction::Activate => self.interact(self.cursor),
            InputAction::Click(pos) => {
                if self.game.board().contains(pos) {
                    self.cursor = pos;
                }
                self.interact(pos)
            }
            InputAction::Difficulty(d) => {
                if self.game.settings().with_difficulty(d).is_ok() {
                    self.next_difficulty = d;
                }
                false
            }
            InputAction::Restart => {
                self.game.restart_game(self.next_difficulty);
                self.cursor = Pos::new(0, 0);
                false
            }
        }
    }

    fn interact(&mut self, pos: Pos) -> bool {
        self.game.handle_cell_interaction(pos.row, pos.col)
    }

    /// Advance the engine by one frame, returning what happened, if anything.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<EngineEvent> {
        self.game.tick(elapsed_ms);
        let event = self.game.take_last_event();
        if let Some(event) = event {
            debug!(?event, "engine event");
        }
        event
    }
}

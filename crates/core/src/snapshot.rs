//! Snapshot module - read-only copy of the engine state for renderers and logs.

use serde::Serialize;

use crate::animation::Animation;
use crate::board::Board;
use crate::game_state::Phase;
use crate::settings::Settings;
use crate::types::{Pos, BOARD_SIZE};

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub phase: Phase,
    pub processing: bool,
    pub selected: Option<Pos>,
    pub animations: Vec<Animation>,
    pub score: u32,
    pub chain: u32,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub settings: Settings,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(BOARD_SIZE),
            phase: Phase::Idle,
            processing: false,
            selected: None,
            animations: Vec::new(),
            score: 0,
            chain: 0,
            game_over: false,
            episode_id: 0,
            seed: 0,
            settings: Settings::default(),
        }
    }
}

impl GameSnapshot {
    /// Whether a click would be acted on right now.
    pub fn accepts_input(&self) -> bool {
        !self.processing && !self.game_over
    }

    /// The animation whose gem ends up at `pos`, if any.
    pub fn animation_at(&self, pos: Pos) -> Option<&Animation> {
        self.animations.iter().find(|a| a.cell() == pos)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

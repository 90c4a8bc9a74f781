//! Game state module - the match engine
//!
//! `GameState` owns the authoritative board, score, selection, animation
//! descriptors and the processing lock. A swap runs as a sequence of timed
//! phases, each advanced by [`GameState::tick`]:
//!
//! ```text
//! Idle -> Swapping -+-> Resolving -> Falling -+-> Resolving ... -> Idle
//!                   |                         +-> Idle (settled)
//!                   +-> Swapping (reverting) -> Idle
//! ```
//!
//! The lock is held whenever the phase is not `Idle`; cell input is ignored
//! while it is held.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::board::{
    drop_gems, fall_moves, fill_empty, find_matches, generate, has_match, has_valid_move,
    remove_matches, Board, MatchSet,
};
use crate::rng::{GemSource, SimpleRng};
use crate::types::{Pos, CASCADE_WARN_DEPTH};
use crate::{calculate_match_score, Animation, GameSnapshot, PhaseTiming, Settings};

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for input, lock released
    #[default]
    Idle,
    /// Two gems sliding past each other; `reverting` once the swap was rejected
    Swapping { a: Pos, b: Pos, reverting: bool },
    /// Matched gems disappearing
    Resolving,
    /// Remaining gems dropping into the gaps
    Falling,
}

/// Notable outcome of a sequence step, for sound and effect triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A swap made no match and was undone
    SwapRejected,
    /// One resolution round started clearing gems
    Cleared { cells: u32, points: u32, chain: u32 },
    /// The board came to rest with no matches left
    Settled { game_over: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<G: GemSource = SimpleRng> {
    board: Board,
    settings: Settings,
    /// Durations and gem count captured when the current sequence started.
    timing: PhaseTiming,
    type_count: u8,
    rng: G,
    /// Seed the gem source started from (0 for custom sources).
    seed: u32,
    phase: Phase,
    phase_elapsed_ms: u32,
    phase_duration_ms: u32,
    /// Cells being cleared during `Resolving`.
    pending: MatchSet,
    selected: Option<Pos>,
    animations: Vec<Animation>,
    score: u32,
    chain: u32,
    game_over: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    last_event: Option<EngineEvent>,
}

impl GameState<SimpleRng> {
    /// Create a new game with a freshly generated board
    pub fn new(settings: Settings, seed: u32) -> Self {
        let rng = SimpleRng::new(seed);
        let seed = rng.seed();
        let mut state = Self::from_board(Board::new(settings.board_size), settings, rng);
        state.seed = seed;
        state.reset();
        state
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::new(Settings::default(), 1)
    }
}

impl<G: GemSource> GameState<G> {
    /// Create a new game drawing gems from `rng`
    pub fn with_source(settings: Settings, rng: G) -> Self {
        let mut state = Self::from_board(Board::new(settings.board_size), settings, rng);
        state.reset();
        state
    }

    /// Start from an existing board instead of generating one.
    ///
    /// The board is taken as-is; it is the caller's job to hand in a settled one.
    pub fn from_board(board: Board, settings: Settings, rng: G) -> Self {
        Self {
            board,
            settings,
            timing: settings.timing(),
            type_count: settings.gem_types(),
            rng,
            seed: 0,
            phase: Phase::Idle,
            phase_elapsed_ms: 0,
            phase_duration_ms: 0,
            pending: MatchSet::default(),
            selected: None,
            animations: Vec::new(),
            score: 0,
            chain: 0,
            game_over: false,
            episode_id: 0,
            last_event: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The processing lock: held from an accepted swap until the board settles.
    pub fn is_processing(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Resolution rounds so far in the current sequence (2+ means cascade).
    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Seed of the built-in generator; the same seed replays the same boards.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Replace the settings. Running sequences keep the values they started with.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Take and clear the last engine event.
    pub fn take_last_event(&mut self) -> Option<EngineEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board.clone_from(&self.board);
        out.phase = self.phase;
        out.processing = self.is_processing();
        out.selected = self.selected;
        out.animations.clear();
        out.animations.extend_from_slice(&self.animations);
        out.score = self.score;
        out.chain = self.chain;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.settings = self.settings;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Generate a fresh board for `difficulty` and clear all progress.
    ///
    /// An invalid difficulty keeps the current one.
    pub fn initialize_game(&mut self, difficulty: u8) {
        match self.settings.with_difficulty(difficulty) {
            Ok(settings) => self.settings = settings,
            Err(err) => warn!(%err, "keeping difficulty {}", self.settings.difficulty),
        }
        self.reset();
    }

    /// Unconditional reset, allowed mid-sequence: in-flight phases and
    /// animations are discarded.
    pub fn restart_game(&mut self, difficulty: u8) {
        let interrupted = self.is_processing();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.initialize_game(difficulty);
        info!(episode = self.episode_id, interrupted, "game restarted");
    }

    fn reset(&mut self) {
        self.type_count = self.settings.gem_types();
        self.timing = self.settings.timing();
        self.board = generate(self.settings.board_size, self.type_count, &mut self.rng);
        self.phase = Phase::Idle;
        self.phase_elapsed_ms = 0;
        self.phase_duration_ms = 0;
        self.pending = MatchSet::default();
        self.selected = None;
        self.animations.clear();
        self.score = 0;
        self.chain = 0;
        self.game_over = false;
        self.last_event = None;
    }

    /// React to a click or tap on `(row, col)`.
    ///
    /// Returns `true` only when the click dispatched a swap that makes a
    /// match. The cascade it starts is still running when this returns.
    /// Clicks while processing, after game over, or outside the board are
    /// ignored and return `false`.
    pub fn handle_cell_interaction(&mut self, row: u8, col: u8) -> bool {
        let pos = Pos::new(row, col);
        if self.is_processing() || self.game_over || !self.board.contains(pos) {
            return false;
        }

        match self.selected {
            None => {
                self.selected = Some(pos);
                false
            }
            Some(sel) if sel == pos => {
                self.selected = None;
                false
            }
            Some(sel) if sel.is_adjacent(pos) => {
                self.selected = None;
                self.attempt_swap(sel, pos)
            }
            Some(_) => {
                self.selected = Some(pos);
                false
            }
        }
    }

    /// Swap two adjacent gems and start the swap animation.
    ///
    /// Returns whether the swapped board has a match; if it does not, the
    /// swap is undone once the animation finishes. Returns `false` without
    /// doing anything if the engine is busy, the game is over, or the cells
    /// are not adjacent.
    pub fn attempt_swap(&mut self, a: Pos, b: Pos) -> bool {
        if self.is_processing()
            || self.game_over
            || !a.is_adjacent(b)
            || !self.board.contains(a)
            || !self.board.contains(b)
        {
            return false;
        }

        // Settings are read once per sequence.
        self.timing = self.settings.timing();
        self.type_count = self.settings.gem_types();
        self.chain = 0;
        self.selected = None;

        self.board.swap(a, b);
        let matched = has_match(&self.board);
        self.animations.clear();
        self.push_swap_animations(a, b);
        self.enter_phase(Phase::Swapping { a, b, reverting: false }, self.timing.swap_ms);
        debug!(?a, ?b, matched, "swap started");
        matched
    }

    /// Advance the phase clock and every animation by `elapsed_ms`.
    ///
    /// When the phase duration has elapsed the phase resolves and the next
    /// one starts on the same call. Returns `true` if a phase resolved.
    /// Does nothing while idle.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }

        self.phase_elapsed_ms = self.phase_elapsed_ms.saturating_add(elapsed_ms);
        let progress = if self.phase_duration_ms == 0 {
            1.0
        } else {
            (self.phase_elapsed_ms as f32 / self.phase_duration_ms as f32).min(1.0)
        };
        for anim in &mut self.animations {
            anim.advance_to(progress);
        }

        if self.phase_elapsed_ms < self.phase_duration_ms {
            return false;
        }
        self.finish_phase();
        true
    }

    /// Alias of [`GameState::tick`] for frame-driven renderers.
    pub fn advance_animations(&mut self, elapsed_ms: u32) -> bool {
        self.tick(elapsed_ms)
    }

    fn enter_phase(&mut self, phase: Phase, duration_ms: u32) {
        self.phase = phase;
        self.phase_elapsed_ms = 0;
        self.phase_duration_ms = duration_ms;
    }

    /// One descriptor per cell; each carries the gem that now sits at its destination.
    fn push_swap_animations(&mut self, a: Pos, b: Pos) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(Some(gem)) = self.board.get(to) {
                self.animations.push(Animation::swapping(from, to, gem));
            }
        }
    }

    fn finish_phase(&mut self) {
        match self.phase {
            Phase::Idle => {}
            Phase::Swapping {
                a,
                b,
                reverting: false,
            } => {
                if has_match(&self.board) {
                    self.begin_round();
                } else {
                    self.board.swap(a, b);
                    self.animations.clear();
                    self.push_swap_animations(b, a);
                    self.enter_phase(Phase::Swapping { a, b, reverting: true }, self.timing.swap_ms);
                    self.last_event = Some(EngineEvent::SwapRejected);
                    debug!(?a, ?b, "swap rejected, reverting");
                }
            }
            Phase::Swapping {
                reverting: true, ..
            } => {
                self.animations.clear();
                self.enter_phase(Phase::Idle, 0);
            }
            Phase::Resolving => self.clear_and_drop(),
            Phase::Falling => self.begin_round(),
        }
    }

    /// Start a resolution round, or finalize when the board has no match.
    fn begin_round(&mut self) {
        let matches = find_matches(&self.board);
        if matches.is_empty() {
            self.finalize();
            return;
        }

        self.chain += 1;
        let points = calculate_match_score(matches.len());
        self.score = self.score.saturating_add(points);

        self.animations.clear();
        for pos in matches.iter() {
            if let Some(Some(gem)) = self.board.get(pos) {
                self.animations.push(Animation::disappearing(pos, gem));
            }
        }

        let cells = matches.len() as u32;
        self.pending = matches;
        self.enter_phase(Phase::Resolving, self.timing.disappear_ms);
        self.last_event = Some(EngineEvent::Cleared {
            cells,
            points,
            chain: self.chain,
        });
        debug!(cells, points, chain = self.chain, score = self.score, "matches cleared");
        if self.chain == CASCADE_WARN_DEPTH {
            warn!(chain = self.chain, "cascade running unusually long");
        }
    }

    fn clear_and_drop(&mut self) {
        let cleared = remove_matches(&self.board, &self.pending);
        self.pending = MatchSet::default();

        let moves = fall_moves(&cleared);
        let dropped = drop_gems(&cleared);
        self.board = fill_empty(&dropped, self.type_count, &mut self.rng);

        self.animations.clear();
        self.animations.extend(
            moves
                .iter()
                .map(|mv| Animation::falling(mv.from, mv.to, mv.gem)),
        );

        if self.animations.is_empty() {
            // Nothing shifted (only top rows cleared): refills just appear.
            self.begin_round();
        } else {
            self.enter_phase(Phase::Falling, self.timing.fall_ms);
        }
    }

    fn finalize(&mut self) {
        self.game_over = !has_valid_move(&self.board);
        self.animations.clear();
        self.enter_phase(Phase::Idle, 0);
        self.last_event = Some(EngineEvent::Settled {
            game_over: self.game_over,
        });
        info!(
            score = self.score,
            chain = self.chain,
            game_over = self.game_over,
            "board settled"
        );
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

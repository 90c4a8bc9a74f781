//! Animation descriptors for gems in transition
//!
//! Each descriptor covers one gem for the length of one phase. Progress only
//! moves forward and is capped at 1.0; the engine drops the descriptors when
//! the phase resolves.

use serde::Serialize;

use crate::types::{Gem, Pos};

/// What a gem is doing during the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationKind {
    /// Sliding between two adjacent cells
    Swapping { from: Pos, to: Pos },
    /// Shrinking away in place
    Disappearing { at: Pos },
    /// Dropping down its column
    Falling { from: Pos, to: Pos },
}

/// One gem mid-transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub gem: Gem,
    pub progress: f32,
}

impl Animation {
    pub fn swapping(from: Pos, to: Pos, gem: Gem) -> Self {
        Self::with_kind(AnimationKind::Swapping { from, to }, gem)
    }

    pub fn disappearing(at: Pos, gem: Gem) -> Self {
        Self::with_kind(AnimationKind::Disappearing { at }, gem)
    }

    pub fn falling(from: Pos, to: Pos, gem: Gem) -> Self {
        Self::with_kind(AnimationKind::Falling { from, to }, gem)
    }

    fn with_kind(kind: AnimationKind, gem: Gem) -> Self {
        Self {
            kind,
            gem,
            progress: 0.0,
        }
    }

    /// Move progress forward to `progress`. Never moves backward.
    pub fn advance_to(&mut self, progress: f32) {
        self.progress = self.progress.max(progress.clamp(0.0, 1.0));
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// The board cell this gem occupies once the phase resolves.
    pub fn cell(&self) -> Pos {
        match self.kind {
            AnimationKind::Swapping { to, .. } | AnimationKind::Falling { to, .. } => to,
            AnimationKind::Disappearing { at } => at,
        }
    }

    /// Fractional `(row, col)` where the gem should be drawn right now.
    ///
    /// Falls use an ease-in curve so gems accelerate; swaps are eased at both ends.
    pub fn position(&self) -> (f32, f32) {
        let lerp = |from: Pos, to: Pos, t: f32| {
            (
                from.row as f32 + (to.row as f32 - from.row as f32) * t,
                from.col as f32 + (to.col as f32 - from.col as f32) * t,
            )
        };
        match self.kind {
            AnimationKind::Swapping { from, to } => lerp(from, to, ease_in_out(self.progress)),
            AnimationKind::Falling { from, to } => lerp(from, to, ease_in(self.progress)),
            AnimationKind::Disappearing { at } => (at.row as f32, at.col as f32),
        }
    }

    /// Remaining visible size in `[0,1]`; only disappearing gems shrink.
    pub fn scale(&self) -> f32 {
        match self.kind {
            AnimationKind::Disappearing { .. } => 1.0 - ease_out(self.progress),
            _ => 1.0,
        }
    }
}

pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in(t: f32) -> f32 {
    t.powi(3)
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t.powi(3)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

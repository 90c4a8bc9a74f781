//! RNG module - seeded gem generation
//!
//! Every random gem on the board comes from a [`GemSource`]. The default
//! source is [`SimpleRng`], a small LCG, so the same seed always produces the
//! same game. Tests can plug in a scripted source to make refills predictable.

use crate::types::Gem;

/// Supplier of gem types for generation and refill.
pub trait GemSource {
    /// Draw a gem type uniformly from `[0, type_count)`.
    fn next_gem(&mut self, type_count: u8) -> Gem;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// The low bits of an LCG cycle with a short period, so the high half
    /// of the state is used.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max
    }

    /// Current RNG state (restarting from it replays the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GemSource for SimpleRng {
    fn next_gem(&mut self, type_count: u8) -> Gem {
        self.next_range(type_count.max(1) as u32) as Gem
    }
}

//! Scoring module - flat per-gem bonus
//!
//! Every matched gem is worth [`MATCH_BONUS`] points in the round it is
//! cleared. Cascades simply add more rounds; there is no chain multiplier.

use crate::types::MATCH_BONUS;

/// Points for one resolution round that clears `matched_cells` gems.
pub fn calculate_match_score(matched_cells: usize) -> u32 {
    (matched_cells as u32).saturating_mul(MATCH_BONUS)
}

// Claimed grid cells per generation band.
//
// The collision pass asks "is this snapped X taken in this band?" for every
// subject it settles. Cells are grid indices, so the check is exact and O(1).

use std::collections::{HashMap, HashSet};

use super::geometry::Generation;

#[derive(Debug, Clone, Default)]
pub struct SlotGrid {
    /// Map from generation band to the cells already taken in it.
    claimed: HashMap<Generation, HashSet<i64>>,
}

impl SlotGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, generation: Generation, cell: i64) -> bool {
        self.claimed.get(&generation).is_some_and(|cells| cells.contains(&cell))
    }

    pub fn claim(&mut self, generation: Generation, cell: i64) {
        self.claimed.entry(generation).or_default().insert(cell);
    }

    /// First free cell at or to the right of `cell`, moving `step` cells at a time.
    pub fn first_free(&self, generation: Generation, cell: i64, step: i64) -> i64 {
        let step = step.max(1); // Avoid spinning in place
        let mut candidate = cell;
        while self.is_claimed(generation, candidate) {
            candidate += step;
        }
        candidate
    }
}

// Geometry primitives: grid snapping and generation bands.
//
// All positions the engine writes go through `Grid`. Collision bookkeeping
// works on integer cell indices so "same snapped X" is exact equality.

use serde::Serialize;

/// Pitch used when a configured pitch is unusable.
pub const FALLBACK_PITCH: f64 = 15.0;

/// Cell indices are clamped to this magnitude so stepping right never overflows.
const MAX_CELL: i64 = 1 << 40;

/// Quantizes coordinates to `phase + k * pitch`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Grid {
    pitch: f64,
    phase: f64,
}

impl Grid {
    pub fn new(pitch: f64, phase: f64) -> Self {
        let pitch = if pitch.is_finite() && pitch > 0.0 { pitch } else { FALLBACK_PITCH };
        let phase = if phase.is_finite() { phase } else { 0.0 };
        Self { pitch, phase }
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Cell index of the grid line nearest to `v`.
    pub fn cell(&self, v: f64) -> i64 {
        let limit = MAX_CELL as f64;
        ((v - self.phase) / self.pitch).round().clamp(-limit, limit) as i64
    }

    /// Coordinate of a cell index.
    pub fn at(&self, cell: i64) -> f64 {
        cell as f64 * self.pitch + self.phase
    }

    pub fn snap(&self, v: f64) -> f64 {
        self.at(self.cell(v))
    }

    /// A distance expressed in whole cells, never less than one.
    pub fn cells(&self, distance: f64) -> i64 {
        if !distance.is_finite() {
            return 1;
        }
        ((distance / self.pitch).round() as i64).max(1)
    }
}

/// The five ancestry bands, top to bottom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    Grandparent,
    Parent,
    #[serde(rename = "self")]
    Ego,
    Child,
    Grandchild,
}

/// Band registry: (generation, lower bound inclusive, upper bound exclusive, center).
pub const GENERATION_BANDS: &[(Generation, f64, f64, f64)] = &[
    (Generation::Grandparent, -75.0, 75.0, 0.0),
    (Generation::Parent, 75.0, 225.0, 150.0),
    (Generation::Ego, 225.0, 375.0, 300.0),
    (Generation::Child, 375.0, 525.0, 450.0),
    (Generation::Grandchild, 525.0, 675.0, 600.0),
];

impl Generation {
    /// Band containing `y`. Anything outside every band is a grandchild.
    pub fn of(y: f64) -> Generation {
        GENERATION_BANDS
            .iter()
            .find(|(_, lo, hi, _)| y >= *lo && y < *hi)
            .map(|(generation, ..)| *generation)
            .unwrap_or(Generation::Grandchild)
    }

    /// Canonical Y of the band.
    pub fn center(self) -> f64 {
        GENERATION_BANDS
            .iter()
            .find(|(generation, ..)| *generation == self)
            .map(|(.., center)| *center)
            .unwrap_or(0.0)
    }

    /// One band further down; the bottom band has nowhere lower to go.
    pub fn below(self) -> Generation {
        match self {
            Generation::Grandparent => Generation::Parent,
            Generation::Parent => Generation::Ego,
            Generation::Ego => Generation::Child,
            Generation::Child | Generation::Grandchild => Generation::Grandchild,
        }
    }
}

// Layout correction for genogram documents.
//
// Takes the rough coordinates a generative producer wrote and makes them
// structurally valid:
// - Couples span their children (fetuses included)
// - No two subjects in one generation share a snapped X
// - No two couples' ranges overlap within one generation
// - Every coordinate sits on the grid
//
// Pipeline (each pass mutates the same cloned document):
// 1. span: place fetuses and widen each couple over its children
// 2. collision: settle X collisions per generation band
// 3. overlap: shift whole family subtrees apart
// A later pass can undo an earlier one (a child moved off a taken slot
// leaves its parents short), so the pipeline repeats until a round changes
// nothing. Rounds are capped; input whose constraints contradict each other
// (a family that is its own ancestor) stops at the cap with a warning.
//
// Submodules:
// - geometry: grid snapping and generation bands
// - index: couple/children lookups built per run
// - slots: per-generation claimed grid cells
// - tree: family trees and the lineage order couples are visited in
// - fetus, span, collision, overlap: the passes

use serde::{Deserialize, Serialize};

use crate::document::{ConfigError, FetusEntry, RawDocument, Subject, SubjectId};

mod collision;
mod fetus;
mod geometry;
mod index;
mod overlap;
mod slots;
mod span;
mod tree;

pub use geometry::{Generation, Grid, GENERATION_BANDS};
pub use index::{CoupleRecord, RelationshipIndex};

use collision::CollisionPass;
use overlap::OverlapPass;
use span::CoupleSpanPass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Grid pitch every coordinate is snapped to.
    pub grid_pitch: f64,
    /// Grid phase: snapped values are `grid_phase + k * grid_pitch`.
    pub grid_phase: f64,
    /// Distance a couple keeps beyond its outermost children.
    pub couple_margin: f64,
    /// Rightward step used to escape a claimed slot.
    pub collision_step: f64,
    /// Horizontal distance between a fetus and its nearest sibling or parent.
    pub fetus_offset: f64,
    /// Gap left between two family subtrees after separating them.
    pub subtree_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_pitch: 15.0,
            grid_phase: 0.0,
            couple_margin: 30.0,
            collision_step: 60.0,
            fetus_offset: 60.0,
            subtree_margin: 30.0,
        }
    }
}

impl LayoutConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_pitch, self.grid_phase)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("grid_pitch", self.grid_pitch),
            ("grid_phase", self.grid_phase),
            ("couple_margin", self.couple_margin),
            ("collision_step", self.collision_step),
            ("fetus_offset", self.fetus_offset),
            ("subtree_margin", self.subtree_margin),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        for (field, value) in [("grid_pitch", self.grid_pitch), ("collision_step", self.collision_step)] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("couple_margin", self.couple_margin),
            ("fetus_offset", self.fetus_offset),
            ("subtree_margin", self.subtree_margin),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Mutable working copy shared by the passes, plus the read-only index.
pub struct LayoutContext<'a> {
    index: &'a RelationshipIndex,
    pub cfg: &'a LayoutConfig,
    pub grid: Grid,
    pub subjects: Vec<Subject>,
    pub fetus: Vec<FetusEntry>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(index: &'a RelationshipIndex, cfg: &'a LayoutConfig, doc: &RawDocument) -> Self {
        Self {
            index,
            cfg,
            grid: cfg.grid(),
            subjects: doc.subjects.clone(),
            fetus: doc.fetus.clone(),
        }
    }

    /// The index outlives any borrow of the context, so passes can walk it
    /// while mutating positions.
    pub fn index(&self) -> &'a RelationshipIndex {
        self.index
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.index.subject_index(id).map(|i| &self.subjects[i])
    }

    pub fn x_of(&self, id: SubjectId) -> Option<f64> {
        self.subject(id).map(|s| s.x)
    }

    pub fn set_x(&mut self, id: SubjectId, x: f64) {
        if let Some(i) = self.index.subject_index(id) {
            self.subjects[i].x = x;
        }
    }

    /// Band of a subject, judged on its snapped Y so the answer never changes
    /// once the subject has been snapped.
    pub fn generation_of(&self, id: SubjectId) -> Option<Generation> {
        self.subject(id).map(|s| Generation::of(self.grid.snap(s.y)))
    }

    /// A couple lives in its husband's band, or its wife's if he is missing.
    pub fn couple_generation(&self, couple: &CoupleRecord) -> Option<Generation> {
        self.generation_of(couple.husband).or_else(|| self.generation_of(couple.wife))
    }

    /// `[min(partner X), max(partner X)]`, when both partners exist.
    pub fn couple_range(&self, couple: &CoupleRecord) -> Option<(f64, f64)> {
        let a = self.x_of(couple.husband)?;
        let b = self.x_of(couple.wife)?;
        Some((a.min(b), a.max(b)))
    }

    /// Every coordinate a pass can move, to tell when a round changed nothing.
    fn positions(&self) -> (Vec<(f64, f64)>, Vec<Option<(f64, f64)>>) {
        (
            self.subjects.iter().map(|s| (s.x, s.y)).collect(),
            self.fetus.iter().map(FetusEntry::position).collect(),
        )
    }

    fn into_parts(self) -> (Vec<Subject>, Vec<FetusEntry>) {
        (self.subjects, self.fetus)
    }
}

/// One correction pass over the working copy. Passes never fail: missing
/// references are skipped.
pub trait CorrectionPass {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut LayoutContext<'_>);
}

/// The passes, in the order they run within a round.
const PIPELINE: &[&dyn CorrectionPass] = &[&CoupleSpanPass, &CollisionPass, &OverlapPass];

/// Rounds allowed per subject or fetus entry before giving up on a fixed point.
const ROUNDS_PER_ENTITY: usize = 4;

/// Correct a document. The input is never modified; the result has the same
/// shape, with fetus entries placed and every coordinate corrected.
pub fn correct_document(doc: &RawDocument, cfg: &LayoutConfig) -> RawDocument {
    let index = RelationshipIndex::build(doc);
    let mut ctx = LayoutContext::new(&index, cfg, doc);

    let max_rounds = ROUNDS_PER_ENTITY * (doc.subjects.len() + doc.fetus.len()) + 2;
    let mut settled = false;
    for round in 1..=max_rounds {
        let before = ctx.positions();
        for pass in PIPELINE {
            log::trace!("round {round}: running {} pass", pass.name());
            pass.run(&mut ctx);
        }
        if ctx.positions() == before {
            log::debug!("layout settled after {round} rounds");
            settled = true;
            break;
        }
    }
    if !settled {
        log::warn!("layout still changing after {max_rounds} rounds; keeping the last one");
    }

    let (subjects, fetus) = ctx.into_parts();
    RawDocument {
        subjects,
        couples: doc.couples.clone(),
        children: doc.children.clone(),
        fetus,
        relations: doc.relations.clone(),
    }
}

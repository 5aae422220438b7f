// Family trees and the order couples are visited in.
//
// A couple's family tree is what moves when that couple has to move: the
// couple, its children, and recursively every couple a child is a partner
// in, plus all of their fetuses.
//
// Within a generation, couples are visited in lineage order: a couple whose
// ancestors come first in the generation above comes first here too.
// Couples with no parent couple are compared by their own min X. Ties fall
// back to input order. Keeping descendants in their ancestors' order means
// pushing a couple right can only ever push couples that come after it.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::document::SubjectId;

use super::geometry::{Generation, GENERATION_BANDS};
use super::index::RelationshipIndex;
use super::LayoutContext;

/// Everything that moves when a couple is shifted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyTree {
    /// Subject ids in discovery order, each once.
    pub members: Vec<SubjectId>,
    /// Fetus entry indices.
    pub fetuses: BTreeSet<usize>,
}

impl FamilyTree {
    /// Collect the family tree rooted at couple `root` (position in
    /// `index.couples()`). Walks an explicit worklist with a visited set, so
    /// cyclic input terminates.
    pub fn collect(index: &RelationshipIndex, root: usize) -> Self {
        let mut tree = FamilyTree::default();
        let mut seen_members: HashSet<SubjectId> = HashSet::new();
        let mut visited: HashSet<usize> = HashSet::new();
        let mut worklist: Vec<usize> = vec![root];

        while let Some(ci) = worklist.pop() {
            if !visited.insert(ci) {
                continue;
            }
            let couple = &index.couples()[ci];

            for id in [couple.husband, couple.wife].into_iter().chain(couple.children.iter().copied()) {
                if seen_members.insert(id) {
                    tree.members.push(id);
                }
            }
            tree.fetuses.extend(couple.fetuses.iter().copied());

            for &child in &couple.children {
                for &next in index.couples_of(child) {
                    if !visited.contains(&next) {
                        worklist.push(next);
                    }
                }
            }
        }

        tree
    }

    /// Move every member right by `offset`, snapping each result. Subjects
    /// whose position in `ctx.subjects` is in `pinned` stay where they are.
    /// Fetuses move in X only.
    pub fn shift(&self, ctx: &mut LayoutContext<'_>, offset: f64, pinned: &HashSet<usize>) {
        let index = ctx.index();
        let grid = ctx.grid;
        for &id in &self.members {
            let Some(i) = index.subject_index(id) else {
                continue;
            };
            if pinned.contains(&i) {
                continue;
            }
            let subject = &mut ctx.subjects[i];
            subject.x = grid.snap(subject.x + offset);
        }
        for &fi in &self.fetuses {
            if let Some((x, y)) = ctx.fetus.get(fi).and_then(|entry| entry.position()) {
                ctx.fetus[fi].set_position(grid.snap(x + offset), y);
            }
        }
    }
}

/// Generations from the top band down.
pub fn generations() -> impl Iterator<Item = Generation> {
    GENERATION_BANDS.iter().map(|&(generation, ..)| generation)
}

/// Couples of `generation` with both partners present, in lineage order.
pub fn lineage_order(ctx: &LayoutContext<'_>, generation: Generation) -> Vec<usize> {
    let mut keyed: Vec<(Vec<(f64, usize)>, usize)> = ctx
        .index()
        .couples()
        .iter()
        .enumerate()
        .filter(|(_, couple)| ctx.couple_range(couple).is_some() && ctx.couple_generation(couple) == Some(generation))
        .map(|(ci, _)| (lineage_key(ctx, ci), ci))
        .collect();
    keyed.sort_by(|a, b| compare_keys(&a.0, &b.0));
    keyed.into_iter().map(|(_, ci)| ci).collect()
}

/// `(min X, input order)` of every couple from the topmost known ancestor
/// down to `ci` itself.
fn lineage_key(ctx: &LayoutContext<'_>, ci: usize) -> Vec<(f64, usize)> {
    let index = ctx.index();
    let mut key = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut current = Some(ci);

    while let Some(c) = current {
        if !seen.insert(c) {
            break;
        }
        let couple = &index.couples()[c];
        let min_x = [couple.husband, couple.wife]
            .into_iter()
            .filter_map(|id| ctx.x_of(id))
            .reduce(f64::min)
            .unwrap_or(0.0);
        key.push((min_x, couple.order));
        current = index.parent_couple(couple.husband).or_else(|| index.parent_couple(couple.wife));
    }

    key.reverse();
    key
}

fn compare_keys(a: &[(f64, usize)], b: &[(f64, usize)]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

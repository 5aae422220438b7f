// Intra-generation collision resolution.
//
// Within each generation band no two subjects may share a snapped X. Slots
// are handed out in three rounds:
// 1. Couples, generation by generation from the top, in lineage order.
//    A couple moves as a rigid pair and takes its family tree along, so it
//    still spans its children.
// 2. Everyone not settled by round 1, in input order
// 3. Placed fetuses, in entry order
// A subject that finds its slot taken moves right by `collision_step` until
// it finds a free one. Every settled subject ends up snapped in X and Y.

use std::collections::{HashMap, HashSet};

use super::geometry::Generation;
use super::index::CoupleRecord;
use super::slots::SlotGrid;
use super::tree::{generations, lineage_order, FamilyTree};
use super::{CorrectionPass, LayoutContext};

pub struct CollisionPass;

impl CorrectionPass for CollisionPass {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn run(&self, ctx: &mut LayoutContext<'_>) {
        let index = ctx.index();
        let step = ctx.grid.cells(ctx.cfg.collision_step);
        let mut slots = SlotGrid::new();
        // Positions in `ctx.subjects` already settled
        let mut settled: HashSet<usize> = HashSet::new();
        let mut trees: HashMap<usize, FamilyTree> = HashMap::new();
        let mut moved = 0usize;

        // Lower generations are ordered only after the ones above have moved
        for generation in generations() {
            for ci in lineage_order(ctx, generation) {
                let shift = settle_couple(ctx, &index.couples()[ci], step, &mut slots, &mut settled);
                if shift != 0 {
                    let offset = ctx.grid.pitch() * shift as f64;
                    let tree = trees.entry(ci).or_insert_with(|| FamilyTree::collect(index, ci));
                    tree.shift(ctx, offset, &settled);
                    moved += 1;
                }
            }
        }

        for i in 0..ctx.subjects.len() {
            if settled.insert(i) && settle_single(ctx, i, step, &mut slots) {
                moved += 1;
            }
        }

        for fi in 0..ctx.fetus.len() {
            let Some((x, y)) = ctx.fetus[fi].position() else {
                continue;
            };
            let y = ctx.grid.snap(y);
            let generation = Generation::of(y);
            let wanted = ctx.grid.cell(x);
            let cell = slots.first_free(generation, wanted, step);
            slots.claim(generation, cell);
            ctx.fetus[fi].set_position(ctx.grid.at(cell), y);
            if cell != wanted {
                log::trace!("fetus #{fi} moved {} cells right", cell - wanted);
                moved += 1;
            }
        }

        log::debug!("collision: {moved} entities moved off a taken slot");
    }
}

/// Settle both partners of a couple together. A partner settled by an earlier
/// couple stays put and only the other one is placed. Returns how many cells
/// the couple had to move right.
fn settle_couple(
    ctx: &mut LayoutContext<'_>,
    couple: &CoupleRecord,
    step: i64,
    slots: &mut SlotGrid,
    settled: &mut HashSet<usize>,
) -> i64 {
    let index = ctx.index();
    let (Some(ia), Some(ib)) = (index.subject_index(couple.husband), index.subject_index(couple.wife)) else {
        return 0;
    };
    if ia == ib {
        return 0;
    }

    let grid = ctx.grid;
    let mut partners: Vec<(usize, Generation, i64)> = [ia, ib]
        .into_iter()
        .filter(|i| !settled.contains(i))
        .map(|i| {
            let s = &ctx.subjects[i];
            (i, Generation::of(grid.snap(s.y)), grid.cell(s.x))
        })
        .collect();
    if partners.is_empty() {
        return 0;
    }

    // Coincident partners: pull the right-hand one a step apart first
    if let [(_, gen_a, cell_a), (_, gen_b, cell_b)] = partners.as_mut_slice() {
        if gen_a == gen_b && cell_a == cell_b {
            *cell_b += step;
        }
    }

    let mut shift = 0i64;
    while partners.iter().any(|&(_, generation, cell)| slots.is_claimed(generation, cell + shift)) {
        shift += step;
    }

    for (i, generation, cell) in partners {
        let cell = cell + shift;
        slots.claim(generation, cell);
        let subject = &mut ctx.subjects[i];
        subject.x = grid.at(cell);
        subject.y = grid.snap(subject.y);
        settled.insert(i);
    }

    if shift != 0 {
        log::trace!("couple ({}, {}) moved {shift} cells right", couple.husband.0, couple.wife.0);
    }
    shift
}

fn settle_single(ctx: &mut LayoutContext<'_>, i: usize, step: i64, slots: &mut SlotGrid) -> bool {
    let grid = ctx.grid;
    let subject = &mut ctx.subjects[i];
    let y = grid.snap(subject.y);
    let generation = Generation::of(y);
    let wanted = grid.cell(subject.x);
    let cell = slots.first_free(generation, wanted, step);
    slots.claim(generation, cell);
    subject.x = grid.at(cell);
    subject.y = y;
    if cell != wanted {
        log::trace!("subject {} moved {} cells right", subject.id.0, cell - wanted);
    }
    cell != wanted
}

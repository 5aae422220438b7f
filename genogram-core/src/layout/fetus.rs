// Fetus placement.
//
// A fetus sits one band below its parents, at the band's center. Horizontally
// it goes right of the rightmost known sibling, else between its parents,
// else beside the one parent we can find. A fetus with no parent on the
// diagram gets X 0 in the child band and is left to the collision pass.
// This is the only code that turns a pending fetus entry into a placed one.

use crate::document::{FetusEntry, SubjectId};

use super::geometry::Generation;
use super::index::CoupleRecord;
use super::LayoutContext;

/// Place the fetuses of one couple. `child_xs` starts with the couple's person
/// children and gains every fetus X, already placed or placed here, so the
/// span corrector sees all of them. Returns how many fetuses were placed.
pub fn place_couple_fetuses(
    ctx: &mut LayoutContext<'_>,
    couple: &CoupleRecord,
    child_xs: &mut Vec<f64>,
) -> usize {
    let mut placed = 0;
    for &fi in &couple.fetuses {
        if let Some((x, _)) = ctx.fetus[fi].position() {
            child_xs.push(x);
            continue;
        }
        let (x, y) = fetus_position(ctx, fi, Some(couple.husband), Some(couple.wife), child_xs);
        place(ctx, fi, x, y);
        child_xs.push(x);
        placed += 1;
    }
    placed
}

/// Place fetuses whose parents are not a known couple, using the same rule
/// without siblings.
pub fn place_unindexed_fetuses(ctx: &mut LayoutContext<'_>) -> usize {
    let index = ctx.index();
    let mut placed = 0;
    for fi in 0..ctx.fetus.len() {
        let entry = &ctx.fetus[fi];
        if entry.is_placed() || entry.parent_key().and_then(|key| index.couple(key)).is_some() {
            continue;
        }
        let (father, mother) = (entry.father(), entry.mother());
        let (x, y) = fetus_position(ctx, fi, father, mother, &[]);
        place(ctx, fi, x, y);
        placed += 1;
    }
    placed
}

fn fetus_position(
    ctx: &LayoutContext<'_>,
    fi: usize,
    father: Option<SubjectId>,
    mother: Option<SubjectId>,
    sibling_xs: &[f64],
) -> (f64, f64) {
    let parent_generation = father
        .and_then(|id| ctx.generation_of(id))
        .or_else(|| mother.and_then(|id| ctx.generation_of(id)));
    let y = parent_generation.map_or(Generation::Child, Generation::below).center();

    let offset = ctx.cfg.fetus_offset;
    let x = match sibling_xs.iter().copied().reduce(f64::max) {
        Some(rightmost) => rightmost + offset,
        None => match (father.and_then(|id| ctx.x_of(id)), mother.and_then(|id| ctx.x_of(id))) {
            (Some(a), Some(b)) => (a + b) / 2.0,
            (Some(single), None) | (None, Some(single)) => single + offset,
            (None, None) => {
                log::warn!("fetus #{fi} has no parent on the diagram; placing it in the child band");
                0.0
            }
        },
    };

    (ctx.grid.snap(x), ctx.grid.snap(y))
}

fn place(ctx: &mut LayoutContext<'_>, fi: usize, x: f64, y: f64) {
    let entry = &mut ctx.fetus[fi];
    if let FetusEntry::Pending { father, mother, status } = entry {
        let placed = FetusEntry::Placed {
            father: *father,
            mother: *mother,
            status: std::mem::take(status),
            x,
            y,
        };
        *entry = placed;
    }
}

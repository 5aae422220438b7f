// Couple-span correction.
//
// For each distinct couple: place its fetuses, gather every child X, and
// widen the couple so it straddles them with `couple_margin` to spare.
// Couples are visited from the lowest generation up, so a couple sees where
// its children's own couples have already spread to.
// Partners are canonicalized so the first id of the couple holds the smaller X,
// and only ever move outward. Childless couples are only reordered.

use std::cmp::Reverse;

use super::fetus::{place_couple_fetuses, place_unindexed_fetuses};
use super::index::CoupleRecord;
use super::{CorrectionPass, LayoutContext};

pub struct CoupleSpanPass;

impl CorrectionPass for CoupleSpanPass {
    fn name(&self) -> &'static str {
        "couple-span"
    }

    fn run(&self, ctx: &mut LayoutContext<'_>) {
        let index = ctx.index();
        let mut widened = 0usize;
        let mut fetuses = 0usize;

        let mut couples: Vec<&CoupleRecord> = index.couples().iter().collect();
        couples.sort_by_key(|couple| Reverse(ctx.couple_generation(couple)));

        for couple in couples {
            let mut child_xs: Vec<f64> =
                couple.children.iter().filter_map(|&id| ctx.x_of(id)).collect();
            fetuses += place_couple_fetuses(ctx, couple, &mut child_xs);
            if correct_span(ctx, couple, &child_xs) {
                widened += 1;
            }
        }

        fetuses += place_unindexed_fetuses(ctx);
        log::debug!("couple-span: {widened} couples spanned, {fetuses} fetuses placed");
    }
}

/// Apply the span rule to one couple. Returns true when the couple had
/// children to span. Couples missing a partner are left alone.
fn correct_span(ctx: &mut LayoutContext<'_>, couple: &CoupleRecord, child_xs: &[f64]) -> bool {
    let (Some(a), Some(b)) = (ctx.x_of(couple.husband), ctx.x_of(couple.wife)) else {
        log::trace!("couple ({}, {}) is missing a partner", couple.husband.0, couple.wife.0);
        return false;
    };
    let mut left = a.min(b);
    let mut right = a.max(b);

    let children_extent = child_xs.iter().copied().fold(None, |acc: Option<(f64, f64)>, x| {
        Some(match acc {
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
            None => (x, x),
        })
    });

    let spanned = match children_extent {
        Some((min_child, max_child)) => {
            let margin = ctx.cfg.couple_margin;
            left = ctx.grid.snap(left.min(min_child - margin));
            right = ctx.grid.snap(right.max(max_child + margin));
            true
        }
        None => false,
    };

    ctx.set_x(couple.husband, left);
    ctx.set_x(couple.wife, right);
    spanned
}

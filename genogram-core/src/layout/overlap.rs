// Subtree overlap resolution.
//
// Two couples in the same generation must not have overlapping partner
// ranges. Generations are walked from the top; within one, couples are
// visited in lineage order. A couple that overlaps one already visited is
// pushed right together with its whole family tree, so a shifted subtree is
// checked again when its own lower generations come up.
//
// Note: unrelated couples are ordered by min X, then input order. Two of
// them with the same min X are ordered by input position only; nothing
// stronger is promised.

use std::collections::{HashMap, HashSet};

use super::tree::{generations, lineage_order, FamilyTree};
use super::{CorrectionPass, LayoutContext};

pub struct OverlapPass;

impl CorrectionPass for OverlapPass {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn run(&self, ctx: &mut LayoutContext<'_>) {
        let index = ctx.index();
        let unpinned = HashSet::new();
        let mut trees: HashMap<usize, FamilyTree> = HashMap::new();
        let mut shifts = 0usize;

        for generation in generations() {
            let mut placed: Vec<usize> = Vec::new();
            for ci in lineage_order(ctx, generation) {
                let couple = &index.couples()[ci];
                for &pi in &placed {
                    let (Some((cur_min, cur_max)), Some((placed_min, placed_max))) =
                        (ctx.couple_range(couple), ctx.couple_range(&index.couples()[pi]))
                    else {
                        continue;
                    };
                    if cur_max > placed_min && cur_min < placed_max {
                        let offset = placed_max - cur_min + ctx.cfg.subtree_margin;
                        let tree = trees.entry(ci).or_insert_with(|| FamilyTree::collect(index, ci));
                        tree.shift(ctx, offset, &unpinned);
                        log::trace!(
                            "couple ({}, {}) overlaps ({}, {}); shifted {} subjects by {offset}",
                            couple.husband.0,
                            couple.wife.0,
                            index.couples()[pi].husband.0,
                            index.couples()[pi].wife.0,
                            tree.members.len(),
                        );
                        shifts += 1;
                    }
                }
                placed.push(ci);
            }
        }

        log::debug!("overlap: {shifts} subtree shifts");
    }
}

//! Distance constraints between adjacent links.

use crate::math::{self as m, Unit};

/// How a pair's correction is divided between its two links.
#[derive(Clone, Copy, Debug)]
pub(super) enum Weighting<'a> {
    /// Both links move by the same amount.
    Even,
    /// Links move in proportion to their inverse masses.
    InverseMass(&'a [f64]),
}

impl Weighting<'_> {
    /// Weight of link `idx` in a pair. The head link never moves.
    #[inline]
    fn weight(&self, idx: usize) -> f64 {
        if idx == 0 {
            return 0.0;
        }
        match self {
            Weighting::Even => 1.0,
            Weighting::InverseMass(masses) => 1.0 / masses[idx],
        }
    }
}

/// Run one pass over the chain, pinning the head to `anchor`
/// and then pulling every adjacent pair towards `separation` in order from head to tail.
///
/// Every pair sees the positions already corrected by the pair before it.
/// Returns the tension measure of the last pair, which is half of its full correction
/// no matter how the correction was split between the two links,
/// or zero if there's only one link.
pub(super) fn solve_pass(
    anchor: m::Vec2,
    positions: &mut [m::Vec2],
    separation: f64,
    weighting: Weighting<'_>,
) -> f64 {
    let _span = tracy_span!("solve constraints", "solve_pass");

    let Some(head) = positions.first_mut() else {
        return 0.0;
    };
    *head = anchor;

    let mut last_tension = 0.0;
    for i in 0..positions.len().saturating_sub(1) {
        let delta = positions[i] - positions[i + 1];
        let dist = delta.mag();

        if dist == 0.0 {
            last_tension = 0.5 * unfold_stack(positions, i, separation);
            continue;
        }

        let w_curr = weighting.weight(i);
        let w_next = weighting.weight(i + 1);
        let w_sum = w_curr + w_next;
        if w_sum == 0.0 {
            last_tension = 0.0;
            continue;
        }

        // moving `next` by all of this would put it exactly at `separation` from `curr`
        let full_correction = delta / dist * (dist - separation);
        positions[i] -= full_correction * (w_curr / w_sum);
        positions[i + 1] += full_correction * (w_next / w_sum);
        last_tension = 0.5 * full_correction.mag();
    }

    last_tension
}

/// Separate a pair whose links sit exactly on top of each other.
///
/// There's no direction between them, so link `i + 1` is moved along the previous segment
/// (or straight down for the first pair), dragging along every link after it
/// that is stacked on the same point so that the whole stack unfolds one link per pair.
fn unfold_stack(positions: &mut [m::Vec2], i: usize, separation: f64) -> f64 {
    let origin = positions[i];
    let dir = i
        .checked_sub(1)
        .and_then(|prev| Unit::try_new(origin - positions[prev]))
        .unwrap_or_else(|| -Unit::unit_y());
    let offset = *dir * separation;

    let stacked = positions[i + 1..]
        .iter_mut()
        .take_while(|p| **p == origin);
    let mut moved = 0;
    for p in stacked {
        *p += offset;
        moved += 1;
    }
    log::warn!(
        "Links {} and {} were in the same position, moved {} links apart",
        i,
        i + 1,
        moved
    );

    separation
}

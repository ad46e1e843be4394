//! Discrete collision resolution, pushing links out of whatever they've ended up inside.

use super::collision::{shape, Circle, LayerMask, Obstacle, OverlapQuery, Rect};
use crate::math as m;

use itertools::izip;

/// Links are pushed out slightly further than the penetration depth
/// so that they aren't still touching the surface on the next step.
pub const PUSH_OUT_OVERSHOOT: f64 = 1.1;

/// Buffers and parameters for one collision pass.
pub(super) struct ResolveView<'a> {
    pub positions: &'a mut [m::Vec2],
    pub prev_positions: &'a mut [m::Vec2],
    pub radii: &'a [f64],
    pub layers: LayerMask,
    pub bounce: f64,
    /// Reused for overlap query results.
    pub overlaps: &'a mut Vec<Obstacle>,
}

/// Push every link but the head out of the solid obstacles it overlaps,
/// bouncing its implied velocity off the contact normal.
///
/// Obstacles are handled one at a time in the order the environment returns them.
pub(super) fn resolve<E: OverlapQuery + ?Sized>(mut view: ResolveView<'_>, env: &E) {
    let _span = tracy_span!("resolve collisions", "resolve");

    for (pos, prev, &radius) in izip!(
        view.positions.iter_mut().skip(1),
        view.prev_positions.iter_mut().skip(1),
        view.radii.iter().skip(1),
    ) {
        view.overlaps.clear();
        env.overlapping(*pos, radius, view.layers, view.overlaps);

        for obstacle in view.overlaps.iter().filter(|o| !o.is_trigger) {
            // recomputed from the current position since earlier obstacles may have moved the link
            let Some(contact) = obstacle.contact(*pos, radius) else {
                continue;
            };
            let vel = *pos - *prev;
            *pos += *contact.normal * (contact.depth * PUSH_OUT_OVERSHOOT);
            *prev = *pos - m::reflect_against(vel, contact.normal, view.bounce);
        }
    }
}

/// Collide links with shapes that aren't part of the environment.
///
/// Circles are pushed apart from links evenly, rects don't move.
/// Only positions are changed, so this adds implied velocity to both sides.
pub(super) fn collide_dynamic(
    positions: &mut [m::Vec2],
    radii: &[f64],
    circles: &mut [Circle],
    rects: &[Rect],
) {
    let _span = tracy_span!("collide dynamic", "collide_dynamic");

    for (pos, &radius) in izip!(positions.iter_mut().skip(1), radii.iter().skip(1)) {
        for circle in circles.iter_mut() {
            if let Some(corr) = shape::circle_circle_resolve(*pos, radius, circle.center, circle.radius)
            {
                *pos += corr;
                circle.center -= corr;
            }
        }
        for rect in rects {
            if let Some(corr) = shape::circle_rect_resolve(*pos, radius, rect) {
                *pos += corr;
            }
        }
    }
}

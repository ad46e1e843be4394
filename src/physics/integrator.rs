//! Verlet integration of link positions with swept collision against the environment.

use super::collision::{LayerMask, SweepQuery};
use crate::math::{self as m, Unit};

use itertools::izip;

/// Per-step parameters of the integrator.
#[derive(Clone, Copy, Debug)]
pub(super) struct IntegrationParams {
    pub dt: f64,
    pub drag: f64,
    pub gravity_scale: f64,
    pub layers: LayerMask,
}

/// Advance every link but the first by one step of duration `params.dt`.
///
/// The implied velocity of each link is scaled by its mass and the drag factor.
/// Motion from the velocity is swept against the environment and stops at the first surface,
/// gravity is added afterwards without sweeping.
/// The head link is only brought up to date so that it has no implied velocity.
pub(super) fn integrate<E: SweepQuery + ?Sized>(
    params: IntegrationParams,
    positions: &mut [m::Vec2],
    prev_positions: &mut [m::Vec2],
    masses: &[f64],
    radii: &[f64],
    env: &E,
) {
    let _span = tracy_span!("integrate", "integrate");

    if let (Some(head), Some(head_prev)) = (positions.first(), prev_positions.first_mut()) {
        *head_prev = *head;
    }

    for (pos, prev, &mass, &radius) in izip!(
        positions.iter_mut().skip(1),
        prev_positions.iter_mut().skip(1),
        masses.iter().skip(1),
        radii.iter().skip(1),
    ) {
        let vel = (*pos - *prev) * mass * params.drag;
        *prev = *pos;

        let motion = vel * params.dt;
        let mut new_pos = *pos + motion;
        if let Some(dir) = Unit::try_new(motion) {
            if let Some(hit) = env.sweep(*pos, radius, dir, motion.mag(), params.layers) {
                new_pos = hit.point + *hit.normal * radius;
            }
        }
        *pos = new_pos;

        pos.y -= params.gravity_scale * mass * params.drag * params.dt;
    }
}

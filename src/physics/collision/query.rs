//! The two spatial queries the simulation needs from whatever owns the environment.
//!
//! Neither query can fail: an environment that can't answer
//! (for example because some backing engine layer isn't available)
//! should report "nothing there", which the solver treats as free space.

use super::{shape::CastHit, LayerMask, Obstacle};
use crate::math::{self as m, Unit};

/// First blocking surface found by a [`SweepQuery`][self::SweepQuery].
pub type SweepHit = CastHit;

/// Swept collision detection for a moving disc.
pub trait SweepQuery {
    /// Move a disc of radius `radius` from `origin` along `dir`
    /// and return the first solid surface it touches within `max_distance`.
    ///
    /// Trigger obstacles and obstacles on layers outside `filter` are ignored.
    fn sweep(
        &self,
        origin: m::Vec2,
        radius: f64,
        dir: Unit<m::Vec2>,
        max_distance: f64,
        filter: LayerMask,
    ) -> Option<SweepHit>;
}

/// Discrete overlap detection for a stationary disc.
pub trait OverlapQuery {
    /// Push every obstacle on a layer in `filter` that intersects the disc into `out`,
    /// trigger obstacles included.
    ///
    /// `out` is not cleared first, so one buffer can be reused across calls.
    fn overlapping(&self, center: m::Vec2, radius: f64, filter: LayerMask, out: &mut Vec<Obstacle>);
}

/// Everything a chain needs to know about the world around it.
pub trait Environment: SweepQuery + OverlapQuery {}
impl<T: SweepQuery + OverlapQuery + ?Sized> Environment for T {}

/// An empty environment where nothing is ever hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEnvironment;

impl SweepQuery for NoEnvironment {
    fn sweep(&self, _: m::Vec2, _: f64, _: Unit<m::Vec2>, _: f64, _: LayerMask) -> Option<SweepHit> {
        None
    }
}

impl OverlapQuery for NoEnvironment {
    fn overlapping(&self, _: m::Vec2, _: f64, _: LayerMask, _: &mut Vec<Obstacle>) {}
}

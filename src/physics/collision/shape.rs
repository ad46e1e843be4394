//! Circle and rectangle primitives and the pure geometry done with them:
//! overlap tests, closest points, push-out corrections and disc casts.

use crate::math::{self as m, Unit};

/// A circle given by its center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Circle {
    pub center: m::Vec2,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: m::Vec2, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle given by its min and max corners.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Rect {
    pub min: m::Vec2,
    pub max: m::Vec2,
}

impl Rect {
    /// Create a rect from two opposite corners in any order.
    pub fn from_corners(a: m::Vec2, b: m::Vec2) -> Self {
        Self {
            min: m::Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: m::Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a rect from its center and half of its side lengths.
    pub fn from_center(center: m::Vec2, hw: f64, hh: f64) -> Self {
        let half = m::Vec2::new(hw.abs(), hh.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min.x
    }
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max.x
    }
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min.y
    }
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> m::Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, point: m::Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

//
// POINT QUERIES
//

/// Check whether a point is strictly inside a circle.
#[inline]
pub fn circle_overlaps_point(center: m::Vec2, radius: f64, point: m::Vec2) -> bool {
    (point - center).mag_sq() < radius * radius
}

/// The point on or inside the rect closest to `point`.
/// This is `point` itself if it's inside the rect.
#[inline]
pub fn closest_point_on_rect(rect: &Rect, point: m::Vec2) -> m::Vec2 {
    // min/max instead of clamp so that an inverted rect can't panic
    m::Vec2::new(
        point.x.max(rect.min.x).min(rect.max.x),
        point.y.max(rect.min.y).min(rect.max.y),
    )
}

//
// PUSH-OUT CORRECTIONS
//

/// Resolve an overlap between two movable circles.
///
/// Returns the correction to add to `pos_a`; the same vector should be subtracted
/// from `pos_b`. Each circle moves by half of the overlap.
/// Returns `None` if the circles don't overlap.
/// Circles with coincident centers have no direction between them,
/// so `a` is pushed towards +y, the same way as links inside circle obstacles.
pub fn circle_circle_resolve(
    pos_a: m::Vec2,
    r_a: f64,
    pos_b: m::Vec2,
    r_b: f64,
) -> Option<m::Vec2> {
    let dist = pos_a - pos_b;
    let dist_mag = dist.mag();
    let r_sum = r_a + r_b;
    if dist_mag >= r_sum {
        return None;
    }
    let dir = Unit::try_new(dist).unwrap_or_else(Unit::unit_y);
    Some(*dir * ((r_sum - dist_mag) * 0.5))
}

/// Resolve an overlap between a movable circle and an immovable rect.
///
/// Returns the correction to add to the circle's position.
///
/// Circles further than `2 * max(width, height)` from the rect's center are rejected
/// before doing any real work. The bound ignores the circle's radius,
/// so it's only an approximation and can skip real contacts
/// (most visibly with rects that are tiny compared to the circle).
/// Circles whose center is inside the rect are not handled here.
pub fn circle_rect_resolve(pos: m::Vec2, r: f64, rect: &Rect) -> Option<m::Vec2> {
    if (pos - rect.center()).mag() > 2.0 * rect.width().max(rect.height()) {
        return None;
    }

    let edge = closest_point_on_rect(rect, pos);
    let dist = pos - edge;
    let dist_mag = dist.mag();
    if dist_mag >= r || dist_mag == 0.0 {
        return None;
    }
    Some(dist / dist_mag * (r - dist_mag))
}

//
// DISC CASTS
//

/// Result of casting a disc against a shape.
#[derive(Clone, Copy, Debug)]
pub struct CastHit {
    /// Point on the surface of the shape where the disc touches it.
    pub point: m::Vec2,
    /// Surface normal at `point`, facing towards the disc.
    pub normal: Unit<m::Vec2>,
    /// Distance the disc travelled before touching.
    pub distance: f64,
}

/// Move a disc from `origin` along `dir` and find where it first touches a circle.
///
/// Discs that start out overlapping the circle don't hit it.
pub fn cast_disc_circle(
    origin: m::Vec2,
    r: f64,
    dir: Unit<m::Vec2>,
    max_distance: f64,
    circle: &Circle,
) -> Option<CastHit> {
    let t = ray_circle_entry(origin, dir, circle.center, circle.radius + r)?;
    if t > max_distance {
        return None;
    }
    let disc_pos = origin + *dir * t;
    let normal = Unit::try_new(disc_pos - circle.center).unwrap_or_else(Unit::unit_y);
    Some(CastHit {
        point: circle.center + *normal * circle.radius,
        normal,
        distance: t,
    })
}

/// Move a disc from `origin` along `dir` and find where it first touches a rect.
///
/// Discs that start out overlapping the rect don't hit it.
pub fn cast_disc_rect(
    origin: m::Vec2,
    r: f64,
    dir: Unit<m::Vec2>,
    max_distance: f64,
    rect: &Rect,
) -> Option<CastHit> {
    if (origin - closest_point_on_rect(rect, origin)).mag_sq() < r * r {
        return None;
    }

    // slab test against the rect grown by r on every side,
    // then fix up the rounded corners of the actual swept shape
    let grown_min = rect.min - m::Vec2::broadcast(r);
    let grown_max = rect.max + m::Vec2::broadcast(r);
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut enter_normal = Unit::unit_y();
    for (o, d, lo, hi, axis) in [
        (origin.x, dir.x, grown_min.x, grown_max.x, m::Vec2::unit_x()),
        (origin.y, dir.y, grown_min.y, grown_max.y, m::Vec2::unit_y()),
    ] {
        if d == 0.0 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (t_lo, t_hi) = ((lo - o) / d, (hi - o) / d);
        let (t_near, t_far) = if t_lo < t_hi { (t_lo, t_hi) } else { (t_hi, t_lo) };
        if t_near > t_enter {
            t_enter = t_near;
            enter_normal = Unit::new_unchecked(-d.signum() * axis);
        }
        t_exit = t_exit.min(t_far);
    }
    if t_enter > t_exit || t_exit < 0.0 || t_enter > max_distance {
        return None;
    }

    let t = t_enter.max(0.0);
    let disc_pos = origin + *dir * t;
    let in_x_span = disc_pos.x >= rect.min.x && disc_pos.x <= rect.max.x;
    let in_y_span = disc_pos.y >= rect.min.y && disc_pos.y <= rect.max.y;
    if t_enter >= 0.0 && (in_x_span || in_y_span) {
        // entered through one of the flat sides
        return Some(CastHit {
            point: disc_pos - *enter_normal * r,
            normal: enter_normal,
            distance: t,
        });
    }

    // in a corner region, the swept shape is a circle of radius r around the corner
    let corner = closest_point_on_rect(rect, disc_pos);
    let t = ray_circle_entry(origin, dir, corner, r)?;
    if t > max_distance {
        return None;
    }
    let disc_pos = origin + *dir * t;
    Some(CastHit {
        point: corner,
        normal: Unit::try_new(disc_pos - corner).unwrap_or(enter_normal),
        distance: t,
    })
}

/// Distance along a ray to where it enters a circle,
/// or `None` if it misses, points away, or starts inside.
fn ray_circle_entry(
    origin: m::Vec2,
    dir: Unit<m::Vec2>,
    center: m::Vec2,
    radius: f64,
) -> Option<f64> {
    let to_origin = origin - center;
    let b = to_origin.dot(*dir);
    let c = to_origin.mag_sq() - radius * radius;
    if c <= 0.0 || b >= 0.0 {
        // inside or moving away
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> m::Vec2 {
        m::Vec2::new(x, y)
    }

    #[test]
    fn point_in_circle() {
        assert!(circle_overlaps_point(v(1.0, 1.0), 1.0, v(1.5, 1.0)));
        assert!(!circle_overlaps_point(v(1.0, 1.0), 1.0, v(2.0, 1.0)));
        // zero radius contains nothing, not even its own center
        assert!(!circle_overlaps_point(v(0.0, 0.0), 0.0, v(0.0, 0.0)));
    }

    #[test]
    fn closest_point_clamps_each_axis() {
        let rect = Rect::from_corners(v(2.0, 1.0), v(-2.0, -1.0));
        assert_eq!(closest_point_on_rect(&rect, v(5.0, 0.5)), v(2.0, 0.5));
        assert_eq!(closest_point_on_rect(&rect, v(-5.0, -5.0)), v(-2.0, -1.0));
        assert_eq!(closest_point_on_rect(&rect, v(0.3, -0.2)), v(0.3, -0.2));

        // a zero-area rect is a single point
        let dot = Rect::from_center(v(1.0, 1.0), 0.0, 0.0);
        assert_eq!(closest_point_on_rect(&dot, v(7.0, -3.0)), v(1.0, 1.0));
    }

    #[test]
    fn circle_circle_is_antisymmetric() {
        let (a, ra) = (v(0.3, 0.1), 0.5);
        let (b, rb) = (v(-0.2, 0.4), 0.7);
        let ab = circle_circle_resolve(a, ra, b, rb).unwrap();
        let ba = circle_circle_resolve(b, rb, a, ra).unwrap();
        assert_eq!(ab, -ba);

        // half the overlap goes to each circle
        let dist = (a - b).mag();
        assert!((ab.mag() - (ra + rb - dist) * 0.5).abs() < 1e-12);
        let a_res = a + ab;
        let b_res = b - ab;
        assert!(((a_res - b_res).mag() - (ra + rb)).abs() < 1e-12);
    }

    #[test]
    fn circle_circle_no_overlap() {
        assert!(circle_circle_resolve(v(0.0, 0.0), 1.0, v(2.0, 0.0), 1.0).is_none());
        assert!(circle_circle_resolve(v(0.0, 0.0), 1.0, v(5.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn circle_circle_coincident_centers_separate_upwards() {
        let corr = circle_circle_resolve(v(1.0, 1.0), 0.5, v(1.0, 1.0), 0.3).unwrap();
        assert_eq!(corr, v(0.0, 0.4));
        // zero-size circles on the same point don't overlap
        assert!(circle_circle_resolve(v(1.0, 1.0), 0.0, v(1.0, 1.0), 0.0).is_none());
    }

    #[test]
    fn circle_rect_pushes_away_from_rect() {
        let rect = Rect::from_center(v(0.0, 0.0), 1.0, 1.0);
        let corr = circle_rect_resolve(v(0.0, 1.2), 0.5, &rect).unwrap();
        assert!(corr.x.abs() < 1e-12);
        assert!((corr.y - 0.3).abs() < 1e-12);

        // corner contact pushes diagonally
        let corr = circle_rect_resolve(v(1.2, 1.2), 0.5, &rect).unwrap();
        assert!((corr.x - corr.y).abs() < 1e-12);
        assert!(corr.x > 0.0);

        assert!(circle_rect_resolve(v(0.0, 1.6), 0.5, &rect).is_none());
    }

    #[test]
    fn circle_rect_early_reject_is_approximate() {
        // a thin rect 10 wide still finds contacts near its far end
        let rect = Rect::from_center(v(0.0, 0.0), 5.0, 0.05);
        assert!(circle_rect_resolve(v(4.9, 0.3), 0.5, &rect).is_some());
        // a rect of zero size skips even real overlaps
        let dot = Rect::from_center(v(0.0, 0.0), 0.0, 0.0);
        assert!(circle_rect_resolve(v(0.1, 0.0), 0.5, &dot).is_none());
    }

    #[test]
    fn disc_cast_hits_circle_surface() {
        let circle = Circle::new(v(5.0, 0.0), 1.0);
        let hit = cast_disc_circle(v(0.0, 0.0), 0.5, Unit::unit_x(), 10.0, &circle).unwrap();
        assert!((hit.distance - 3.5).abs() < 1e-12);
        assert!((hit.point - v(4.0, 0.0)).mag() < 1e-12);
        assert!((*hit.normal - v(-1.0, 0.0)).mag() < 1e-12);
        // stopping at point + normal * r puts the disc exactly in contact
        let stop = hit.point + *hit.normal * 0.5;
        assert!(((stop - circle.center).mag() - 1.5).abs() < 1e-12);

        assert!(cast_disc_circle(v(0.0, 0.0), 0.5, Unit::unit_x(), 3.0, &circle).is_none());
        assert!(cast_disc_circle(v(0.0, 0.0), 0.5, -Unit::unit_x(), 10.0, &circle).is_none());
        assert!(cast_disc_circle(v(0.0, 2.0), 0.5, Unit::unit_x(), 10.0, &circle).is_none());
    }

    #[test]
    fn disc_cast_hits_rect_face() {
        let floor = Rect::from_corners(v(-10.0, -1.0), v(10.0, 0.0));
        let hit = cast_disc_rect(v(1.0, 3.0), 0.5, -Unit::unit_y(), 5.0, &floor).unwrap();
        assert!((hit.distance - 2.5).abs() < 1e-12);
        assert!((hit.point - v(1.0, 0.0)).mag() < 1e-12);
        assert_eq!(*hit.normal, v(0.0, 1.0));

        // too short
        assert!(cast_disc_rect(v(1.0, 3.0), 0.5, -Unit::unit_y(), 2.0, &floor).is_none());
        // parallel and outside
        assert!(cast_disc_rect(v(1.0, 3.0), 0.5, Unit::unit_x(), 50.0, &floor).is_none());
        // starts overlapping
        assert!(cast_disc_rect(v(1.0, 0.2), 0.5, -Unit::unit_y(), 5.0, &floor).is_none());
    }

    #[test]
    fn disc_cast_rounds_rect_corners() {
        let rect = Rect::from_corners(v(0.0, 0.0), v(1.0, 1.0));
        // clips the corner of the grown box but not the rounded corner itself
        let dir = Unit::new_normalize(v(1.0, -1.0));
        assert!(cast_disc_rect(v(0.3, 2.5), 0.5, dir, 10.0, &rect).is_none());

        // heads straight for the corner
        let dir = Unit::new_normalize(v(-1.0, -1.0));
        let hit = cast_disc_rect(v(3.0, 3.0), 0.5, dir, 10.0, &rect).unwrap();
        assert_eq!(hit.point, v(1.0, 1.0));
        assert!((hit.distance - (2.0 * 2.0_f64.sqrt() - 0.5)).abs() < 1e-9);
        assert!((*hit.normal - v(1.0, 1.0).normalized()).mag() < 1e-9);
    }
}

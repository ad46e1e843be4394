use super::shape::{self, Circle, Rect};
use crate::math::{self as m, Unit};

/// The collision layer obstacles are put on unless told otherwise.
pub const DEFAULT_LAYER: u32 = 0;

/// A bitmask of collision layers, passed explicitly to every environment query
/// to choose which obstacles it can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = LayerMask(u32::MAX);
    pub const NONE: Self = LayerMask(0);

    /// A mask containing only the given layer. Layers above 31 don't exist.
    #[inline]
    pub const fn layer(layer: u32) -> Self {
        if layer < 32 {
            LayerMask(1 << layer)
        } else {
            LayerMask(0)
        }
    }

    #[inline]
    pub const fn with_layer(self, layer: u32) -> Self {
        LayerMask(self.0 | Self::layer(layer).0)
    }

    #[inline]
    pub const fn contains(&self, layer: u32) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// The shape of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ObstacleShape {
    Circle(Circle),
    Rect(Rect),
}

/// A piece of environment geometry that links can collide with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Obstacle {
    pub shape: ObstacleShape,
    /// Trigger obstacles are reported by overlap queries but never push anything.
    pub is_trigger: bool,
    pub layer: u32,
}

/// Penetration of a disc into an obstacle.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point on the obstacle's surface closest to the disc.
    pub point: m::Vec2,
    /// Direction to push the disc in to get it out.
    pub normal: Unit<m::Vec2>,
    /// How far the disc needs to move along `normal` to stop touching.
    pub depth: f64,
}

impl Obstacle {
    pub fn new_circle(center: m::Vec2, radius: f64) -> Self {
        Self {
            shape: ObstacleShape::Circle(Circle::new(center, radius)),
            is_trigger: false,
            layer: DEFAULT_LAYER,
        }
    }

    pub fn new_rect(rect: Rect) -> Self {
        Self {
            shape: ObstacleShape::Rect(rect),
            is_trigger: false,
            layer: DEFAULT_LAYER,
        }
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Check whether a disc overlaps the obstacle at all.
    pub fn overlaps_disc(&self, center: m::Vec2, radius: f64) -> bool {
        match self.shape {
            ObstacleShape::Circle(c) => {
                shape::circle_overlaps_point(c.center, c.radius + radius, center)
            }
            ObstacleShape::Rect(r) => shape::circle_overlaps_point(
                shape::closest_point_on_rect(&r, center),
                radius,
                center,
            ),
        }
    }

    /// Find how deep a disc penetrates the obstacle, if it does.
    ///
    /// Also handles discs whose center is inside the obstacle:
    /// those are pushed out through the nearest side of a rect,
    /// and straight up from the exact center of a circle.
    pub fn contact(&self, center: m::Vec2, radius: f64) -> Option<Contact> {
        match self.shape {
            ObstacleShape::Circle(c) => {
                let offset = center - c.center;
                let dist = offset.mag();
                let depth = c.radius + radius - dist;
                if depth <= 0.0 {
                    return None;
                }
                let normal = Unit::try_new(offset).unwrap_or_else(Unit::unit_y);
                Some(Contact {
                    point: c.center + *normal * c.radius,
                    normal,
                    depth,
                })
            }
            ObstacleShape::Rect(r) => {
                if !r.contains(center) {
                    let point = shape::closest_point_on_rect(&r, center);
                    let offset = center - point;
                    let dist = offset.mag();
                    let depth = radius - dist;
                    return Unit::try_new(offset)
                        .filter(|_| depth > 0.0)
                        .map(|normal| Contact {
                            point,
                            normal,
                            depth,
                        });
                }

                // inside: exit through the closest side,
                // ties broken in favor of the top so resting links pop upwards
                let sides = [
                    (r.max.y - center.y, m::Vec2::unit_y()),
                    (center.y - r.min.y, -m::Vec2::unit_y()),
                    (r.max.x - center.x, m::Vec2::unit_x()),
                    (center.x - r.min.x, -m::Vec2::unit_x()),
                ];
                let (face_dist, normal) = sides
                    .into_iter()
                    .fold(sides[0], |best, side| if side.0 < best.0 { side } else { best });
                Some(Contact {
                    point: center + normal * face_dist,
                    normal: Unit::new_unchecked(normal),
                    depth: radius + face_dist,
                })
            }
        }
    }
}

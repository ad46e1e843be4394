use super::{
    query::{OverlapQuery, SweepHit, SweepQuery},
    shape, LayerMask, Obstacle, ObstacleShape,
};
use crate::math::{self as m, Unit};

use thunderdome as td;

/// Key type to look up an obstacle stored in an [`ObstacleSet`][self::ObstacleSet].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleKey(pub(super) td::Index);

impl ObstacleKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// The simplest possible environment, which checks every query against every obstacle.
/// Very inefficient for large worlds, but fine for a handful of obstacles.
///
/// Obstacles can be moved or removed between ticks,
/// which is how moving obstacles are represented.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    obstacles: td::Arena<Obstacle>,
}

impl ObstacleSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, obstacle: Obstacle) -> ObstacleKey {
        ObstacleKey(self.obstacles.insert(obstacle))
    }

    /// Access an obstacle, if it still exists.
    #[inline]
    pub fn get(&self, key: ObstacleKey) -> Option<&Obstacle> {
        self.obstacles.get(key.0)
    }

    /// Mutably access an obstacle, if it still exists.
    #[inline]
    pub fn get_mut(&mut self, key: ObstacleKey) -> Option<&mut Obstacle> {
        self.obstacles.get_mut(key.0)
    }

    #[inline]
    pub fn remove(&mut self, key: ObstacleKey) -> Option<Obstacle> {
        self.obstacles.remove(key.0)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleKey, &Obstacle)> {
        self.obstacles.iter().map(|(idx, o)| (ObstacleKey(idx), o))
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        let mut set = ObstacleSet::new();
        for obstacle in iter {
            set.insert(obstacle);
        }
        set
    }
}

impl SweepQuery for ObstacleSet {
    fn sweep(
        &self,
        origin: m::Vec2,
        radius: f64,
        dir: Unit<m::Vec2>,
        max_distance: f64,
        filter: LayerMask,
    ) -> Option<SweepHit> {
        self.obstacles
            .iter()
            .map(|(_, o)| o)
            .filter(|o| !o.is_trigger && filter.contains(o.layer))
            .filter_map(|o| match &o.shape {
                ObstacleShape::Circle(c) => {
                    shape::cast_disc_circle(origin, radius, dir, max_distance, c)
                }
                ObstacleShape::Rect(r) => shape::cast_disc_rect(origin, radius, dir, max_distance, r),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl OverlapQuery for ObstacleSet {
    fn overlapping(&self, center: m::Vec2, radius: f64, filter: LayerMask, out: &mut Vec<Obstacle>) {
        out.extend(
            self.obstacles
                .iter()
                .map(|(_, o)| o)
                .filter(|o| filter.contains(o.layer) && o.overlaps_disc(center, radius)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{Rect, DEFAULT_LAYER};

    fn v(x: f64, y: f64) -> m::Vec2 {
        m::Vec2::new(x, y)
    }

    fn scene() -> (ObstacleSet, [ObstacleKey; 3]) {
        let mut set = ObstacleSet::new();
        let floor = set.insert(Obstacle::new_rect(Rect::from_corners(
            v(-10.0, -1.0),
            v(10.0, 0.0),
        )));
        let ball = set.insert(Obstacle::new_circle(v(0.0, 2.0), 0.5).with_layer(2));
        let sensor = set.insert(Obstacle::new_circle(v(0.0, 4.0), 0.5).as_trigger());
        (set, [floor, ball, sensor])
    }

    #[test]
    fn sweep_returns_nearest_solid_hit() {
        let (set, _) = scene();
        let hit = set
            .sweep(v(0.0, 6.0), 0.1, -Unit::unit_y(), 10.0, LayerMask::ALL)
            .unwrap();
        // goes through the trigger and stops on top of the ball
        assert!((hit.point - v(0.0, 2.5)).mag() < 1e-12);
        assert!((hit.distance - 3.4).abs() < 1e-12);

        // with the ball's layer filtered out, the floor is hit instead
        let hit = set
            .sweep(
                v(0.0, 6.0),
                0.1,
                -Unit::unit_y(),
                10.0,
                LayerMask::layer(DEFAULT_LAYER),
            )
            .unwrap();
        assert!((hit.point - v(0.0, 0.0)).mag() < 1e-12);
        assert_eq!(*hit.normal, v(0.0, 1.0));

        assert!(set
            .sweep(v(0.0, 6.0), 0.1, Unit::unit_y(), 10.0, LayerMask::ALL)
            .is_none());
        assert!(set
            .sweep(v(0.0, 6.0), 0.1, -Unit::unit_y(), 10.0, LayerMask::NONE)
            .is_none());
    }

    #[test]
    fn overlap_reports_triggers_and_respects_layers() {
        let (set, [floor, _ball, sensor]) = scene();
        let mut out = Vec::new();

        set.overlapping(v(0.0, 4.2), 0.3, LayerMask::ALL, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], *set.get(sensor).unwrap());

        out.clear();
        set.overlapping(v(0.0, 1.6), 0.2, LayerMask::layer(DEFAULT_LAYER), &mut out);
        assert!(out.is_empty());
        set.overlapping(v(0.0, 1.6), 0.2, LayerMask::ALL, &mut out);
        assert_eq!(out.len(), 1);

        out.clear();
        set.overlapping(v(5.0, 0.1), 0.2, LayerMask::ALL, &mut out);
        assert_eq!(out, vec![*set.get(floor).unwrap()]);
    }

    #[test]
    fn obstacles_can_move_and_disappear() {
        let (mut set, [floor, ball, _]) = scene();
        set.get_mut(ball).unwrap().shape = ObstacleShape::Circle(shape::Circle::new(v(8.0, 2.0), 0.5));
        set.remove(floor);
        assert_eq!(set.len(), 2);
        assert!(set.get(floor).is_none());
        assert!(set
            .sweep(v(0.0, 6.0), 0.1, -Unit::unit_y(), 10.0, LayerMask::ALL)
            .is_none());
    }
}

use super::{chain::Chain, collision::Environment};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thunderdome as td;

/// Key type to look up a chain stored in a [`ChainSet`][self::ChainSet].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainKey(pub(super) td::Index);

impl ChainKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// A collection of independent chains stepped together in one shared environment.
///
/// Chains don't collide with each other.
/// With the `parallel` feature enabled, chains are stepped on the rayon thread pool.
#[derive(Clone, Debug, Default)]
pub struct ChainSet {
    chains: td::Arena<Chain>,
}

impl ChainSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, chain: Chain) -> ChainKey {
        ChainKey(self.chains.insert(chain))
    }

    #[inline]
    pub fn get(&self, key: ChainKey) -> Option<&Chain> {
        self.chains.get(key.0)
    }

    /// Mutably access a chain, e.g. to move its head anchor.
    #[inline]
    pub fn get_mut(&mut self, key: ChainKey) -> Option<&mut Chain> {
        self.chains.get_mut(key.0)
    }

    #[inline]
    pub fn remove(&mut self, key: ChainKey) -> Option<Chain> {
        self.chains.remove(key.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChainKey, &Chain)> {
        self.chains.iter().map(|(idx, c)| (ChainKey(idx), c))
    }

    /// Step every chain by one tick.
    pub fn step_all<E: Environment + Sync + ?Sized>(&mut self, dt: f64, env: &E) {
        let _span = tracy_span!("step chains", "step_all");

        #[cfg(feature = "parallel")]
        {
            let mut chains: Vec<&mut Chain> = self.chains.iter_mut().map(|(_, c)| c).collect();
            chains.par_iter_mut().for_each(|chain| chain.step(dt, env));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (_, chain) in self.chains.iter_mut() {
                chain.step(dt, env);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::{self as m, Unit},
        physics::{
            collision::{NoEnvironment, Obstacle, ObstacleSet, Rect},
            ChainConfig,
        },
    };

    fn v(x: f64, y: f64) -> m::Vec2 {
        m::Vec2::new(x, y)
    }

    #[test]
    fn chains_step_independently() {
        let config = ChainConfig::default()
            .with_num_links(4)
            .with_link_separation(0.5);
        let mut set = ChainSet::new();
        let a = set.insert(Chain::with_layout(config, v(0.0, 0.0), Unit::unit_x()).unwrap());
        let b = set.insert(Chain::with_layout(config, v(10.0, 0.0), Unit::unit_x()).unwrap());
        let mut alone = Chain::with_layout(config, v(10.0, 0.0), Unit::unit_x()).unwrap();

        for (key, anchor) in [(a, v(0.0, 2.0)), (b, v(12.0, 0.0))] {
            set.get_mut(key).unwrap().set_head_anchor(anchor);
        }
        alone.set_head_anchor(v(12.0, 0.0));
        for _ in 0..10 {
            set.step_all(1.0 / 60.0, &NoEnvironment);
            alone.step(1.0 / 60.0, &NoEnvironment);
        }

        assert_eq!(set.get(a).unwrap().positions()[0], v(0.0, 2.0));
        // stepping in a set is the same as stepping alone
        assert_eq!(set.get(b).unwrap().positions(), alone.positions());

        assert!(set.remove(a).is_some());
        assert!(set.get(a).is_none());
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|(k, _)| k), Some(b));
    }

    #[test]
    fn shared_environment() {
        let env: ObstacleSet = [Obstacle::new_rect(Rect::from_corners(
            v(-50.0, -3.0),
            v(50.0, -1.0),
        ))]
        .into_iter()
        .collect();
        let config = ChainConfig::default()
            .with_num_links(5)
            .with_link_separation(0.5)
            .with_gravity_scale(20.0);
        let mut set = ChainSet::new();
        for x in [-10.0, 0.0, 10.0] {
            set.insert(Chain::with_layout(config, v(x, 0.0), Unit::unit_x()).unwrap());
        }
        for _ in 0..300 {
            set.step_all(1.0 / 60.0, &env);
        }
        for (_, chain) in set.iter() {
            assert!(chain.positions().iter().all(|p| p.y > -1.0));
        }
    }
}

use super::{
    chain::Chain,
    collision::Environment,
    config::{ChainConfig, ConfigError},
};
use crate::math as m;

/// A single chain bundled together with the environment it collides with.
///
/// This is the whole per-tick interface in one place:
/// set the head anchor, step, then read the link positions.
#[derive(Clone, Debug)]
pub struct Simulation<E> {
    chain: Chain,
    env: E,
}

impl<E: Environment> Simulation<E> {
    /// Create a chain from `config`, with every link at the origin.
    pub fn new(config: ChainConfig, env: E) -> Result<Self, ConfigError> {
        Ok(Self::from_chain(Chain::new(config)?, env))
    }

    pub fn from_chain(chain: Chain, env: E) -> Self {
        Self { chain, env }
    }

    #[inline]
    pub fn set_head_anchor(&mut self, position: m::Vec2) {
        self.chain.set_head_anchor(position);
    }

    /// Advance by one fixed tick.
    pub fn step(&mut self, dt: f64) {
        self.chain.step(dt, &self.env);
    }

    /// Positions of all links, starting from the head.
    #[inline]
    pub fn link_positions(&self) -> &[m::Vec2] {
        self.chain.positions()
    }

    #[inline]
    pub fn is_in_tension(&self) -> bool {
        self.chain.is_in_tension()
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    #[inline]
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    #[inline]
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Access the environment, e.g. to move obstacles between ticks.
    #[inline]
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_parts(self) -> (Chain, E) {
        (self.chain, self.env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{NoEnvironment, Obstacle, ObstacleSet};

    fn v(x: f64, y: f64) -> m::Vec2 {
        m::Vec2::new(x, y)
    }

    #[test]
    fn per_tick_interface() {
        let config = ChainConfig::default()
            .with_num_links(3)
            .with_link_separation(1.0);
        let mut sim = Simulation::new(config, NoEnvironment).unwrap();
        sim.step(1.0 / 60.0);
        let pos = sim.link_positions();
        assert!((pos[1] - v(0.0, -1.0)).mag() < 1e-2);
        assert!((pos[2] - v(0.0, -2.0)).mag() < 1e-2);
        assert!(!sim.is_in_tension());

        // a big jump of the anchor drags the whole chain along
        sim.set_head_anchor(v(2.0, 3.0));
        sim.step(1.0 / 60.0);
        let pos = sim.link_positions();
        assert_eq!(pos[0], v(2.0, 3.0));
        assert!(((pos[1] - pos[0]).mag() - 1.0).abs() < 1e-2);
        assert!(((pos[2] - pos[1]).mag() - 1.0).abs() < 1e-2);
        assert!(sim.is_in_tension());

        assert!(Simulation::new(config.with_substeps(0), NoEnvironment).is_err());
    }

    #[test]
    fn obstacles_move_between_ticks() {
        let config = ChainConfig::default()
            .with_num_links(2)
            .with_link_separation(1.0)
            .with_link_radius(0.25);
        let mut env = ObstacleSet::new();
        let ball = env.insert(Obstacle::new_circle(v(10.0, 10.0), 0.5));
        let chain = Chain::with_layout(config, v(0.0, 0.0), -crate::math::Unit::unit_y()).unwrap();
        let mut sim = Simulation::from_chain(chain, env);

        sim.step(1.0 / 60.0);
        assert!((sim.link_positions()[1] - v(0.0, -1.0)).mag() < 1e-9);

        // put the ball right next to the hanging link, it gets pushed sideways
        if let Some(obstacle) = sim.environment_mut().get_mut(ball) {
            *obstacle = Obstacle::new_circle(v(0.5, -1.0), 0.5);
        }
        sim.step(1.0 / 60.0);
        let link = sim.link_positions()[1];
        assert!(link.x < 0.0);
        assert!((link - v(0.5, -1.0)).mag() >= 0.75 - 1e-6);

        let (chain, env) = sim.into_parts();
        assert_eq!(chain.len(), 2);
        assert_eq!(env.len(), 1);
    }
}

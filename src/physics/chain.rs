//! A chain of links following an anchor point.

use super::{
    collision::{Circle, Environment, Obstacle, OverlapQuery, Rect, SweepQuery},
    config::{ChainConfig, ConfigError},
    constraint::{self, Weighting},
    integrator::{self, IntegrationParams},
    resolver::{self, ResolveView},
};
use crate::math::{self as m, Unit};

use itertools::izip;

/// A copy of the state of one link in a [`Chain`][self::Chain].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub position: m::Vec2,
    /// Where the link was before the last integration step.
    pub previous_position: m::Vec2,
    pub radius: f64,
    pub mass: f64,
}

impl Link {
    /// Velocity implied by the last integration step, in distance per step.
    #[inline]
    pub fn velocity(&self) -> m::Vec2 {
        self.position - self.previous_position
    }
}

/// A fixed number of links kept at a constant distance from each other,
/// with the first one (the head) attached to an externally controlled anchor.
///
/// Link data is stored in separate buffers per property.
#[derive(Clone, Debug)]
pub struct Chain {
    config: ChainConfig,
    positions: Vec<m::Vec2>,
    prev_positions: Vec<m::Vec2>,
    masses: Vec<f64>,
    radii: Vec<f64>,
    head_anchor: m::Vec2,
    in_tension: bool,
    overlap_buf: Vec<Obstacle>,
}

impl Chain {
    /// Create a chain with every link at the origin.
    ///
    /// The links spread out to their separation during the first step.
    pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let positions = vec![m::Vec2::zero(); config.num_links];
        Ok(Self::from_parts(config, positions))
    }

    /// Create a chain laid out in a straight line
    /// starting at `head` and continuing in direction `dir`.
    pub fn with_layout(
        config: ChainConfig,
        head: m::Vec2,
        dir: Unit<m::Vec2>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let step = *dir * config.link_separation;
        let positions = (0..config.num_links)
            .map(|i| head + step * i as f64)
            .collect();
        Ok(Self::from_parts(config, positions))
    }

    /// Create a chain with links at the given positions, starting from the head.
    ///
    /// The number of positions must match `config.num_links`.
    pub fn from_positions(config: ChainConfig, positions: &[m::Vec2]) -> Result<Self, ConfigError> {
        config.validate()?;
        if positions.len() != config.num_links {
            return Err(ConfigError::PositionCountMismatch {
                expected: config.num_links,
                got: positions.len(),
            });
        }
        Ok(Self::from_parts(config, positions.to_vec()))
    }

    /// Assumes `config` has been validated and matches the number of positions.
    fn from_parts(config: ChainConfig, positions: Vec<m::Vec2>) -> Self {
        let (masses, radii): (Vec<f64>, Vec<f64>) = (0..config.num_links)
            .map(|i| config.link_properties(i))
            .unzip();
        let head_anchor = positions[0];
        log::debug!(
            "Created chain of {} links, head at ({}, {})",
            config.num_links,
            head_anchor.x,
            head_anchor.y
        );

        Self {
            config,
            prev_positions: positions.clone(),
            positions,
            masses,
            radii,
            head_anchor,
            in_tension: false,
            overlap_buf: Vec::new(),
        }
    }

    /// Replace the parameters of the chain.
    ///
    /// The number of links can't change. Link masses and radii are updated immediately,
    /// positions are left where they are.
    pub fn apply_config(&mut self, config: ChainConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.num_links != self.config.num_links {
            return Err(ConfigError::LinkCountChanged {
                current: self.config.num_links,
                requested: config.num_links,
            });
        }
        for (i, mass, radius) in izip!(0.., &mut self.masses, &mut self.radii) {
            (*mass, *radius) = config.link_properties(i);
        }
        self.config = config;
        log::debug!("Reconfigured chain of {} links", config.num_links);
        Ok(())
    }

    //
    // Stepping
    //

    /// Set the position the head link is pinned to from the next constraint pass onwards.
    #[inline]
    pub fn set_head_anchor(&mut self, position: m::Vec2) {
        self.head_anchor = position;
    }

    /// Advance the simulation by one tick of duration `dt`.
    ///
    /// Each tick is split into `substeps` integration steps,
    /// each followed by `constraint_iterations` constraint passes
    /// with a collision pass after every other one, starting with the first.
    pub fn step<E: Environment + ?Sized>(&mut self, dt: f64, env: &E) {
        let _span = tracy_span!("chain tick", "step");

        let sub_dt = dt / self.config.substeps as f64;
        for _ in 0..self.config.substeps {
            self.integrate(sub_dt, env);
            for iter in 0..self.config.constraint_iterations {
                self.solve_constraints();
                if iter % 2 == 0 {
                    self.resolve_collisions(env);
                }
            }
        }
    }

    /// Run only the integration phase of a step.
    pub fn integrate<E: SweepQuery + ?Sized>(&mut self, dt: f64, env: &E) {
        integrator::integrate(
            IntegrationParams {
                dt,
                drag: self.config.drag,
                gravity_scale: self.config.gravity_scale,
                layers: self.config.collision_layers,
            },
            &mut self.positions,
            &mut self.prev_positions,
            &self.masses,
            &self.radii,
            env,
        );
    }

    /// Run one constraint pass, pinning the head to the anchor
    /// and updating the tension hint.
    pub fn solve_constraints(&mut self) {
        let weighting = if self.config.mass_weighted_constraints {
            Weighting::InverseMass(&self.masses)
        } else {
            Weighting::Even
        };
        let last_tension = constraint::solve_pass(
            self.head_anchor,
            &mut self.positions,
            self.config.link_separation,
            weighting,
        );

        let in_tension = last_tension > self.config.tension_threshold;
        if in_tension != self.in_tension {
            log::trace!("Chain tension changed to {in_tension}");
        }
        self.in_tension = in_tension;
    }

    /// Run one collision pass against the environment.
    pub fn resolve_collisions<E: OverlapQuery + ?Sized>(&mut self, env: &E) {
        resolver::resolve(
            ResolveView {
                positions: &mut self.positions,
                prev_positions: &mut self.prev_positions,
                radii: &self.radii,
                layers: self.config.collision_layers,
                bounce: self.config.ground_bounce,
                overlaps: &mut self.overlap_buf,
            },
            env,
        );
    }

    /// Push links out of movable circles and immovable rects that the environment doesn't know about.
    /// Circles are moved away from the links by the same amount the links move.
    pub fn collide_dynamic(&mut self, circles: &mut [Circle], rects: &[Rect]) {
        resolver::collide_dynamic(&mut self.positions, &self.radii, circles, rects);
    }

    //
    // Access
    //

    /// Current positions of all links, starting from the head.
    #[inline]
    pub fn positions(&self) -> &[m::Vec2] {
        &self.positions
    }

    /// Positions of all links before the last integration step.
    #[inline]
    pub fn previous_positions(&self) -> &[m::Vec2] {
        &self.prev_positions
    }

    /// Whether the end of the chain was being pulled on during the last constraint pass.
    #[inline]
    pub fn is_in_tension(&self) -> bool {
        self.in_tension
    }

    #[inline]
    pub fn head_anchor(&self) -> m::Vec2 {
        self.head_anchor
    }

    #[inline]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Number of links. Always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn link(&self, idx: usize) -> Option<Link> {
        Some(Link {
            position: *self.positions.get(idx)?,
            previous_position: self.prev_positions[idx],
            radius: self.radii[idx],
            mass: self.masses[idx],
        })
    }

    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        izip!(&self.positions, &self.prev_positions, &self.radii, &self.masses).map(
            |(&position, &previous_position, &radius, &mass)| Link {
                position,
                previous_position,
                radius,
                mass,
            },
        )
    }

    /// Teleport a link, setting its implied velocity with `previous_position`.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn set_link_state(&mut self, idx: usize, position: m::Vec2, previous_position: m::Vec2) {
        self.positions[idx] = position;
        self.prev_positions[idx] = previous_position;
    }
}

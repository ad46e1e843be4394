//! Parameters shared by every link of a chain.

use super::collision::LayerMask;

/// Mass and radius for the last link of a chain,
/// used to give the end of a chain some extra weight.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct HeavyTail {
    pub mass: f64,
    pub radius: f64,
}

/// Parameters for constructing a [`Chain`][super::Chain].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ChainConfig {
    pub num_links: usize,
    pub link_radius: f64,
    pub link_mass: f64,
    /// Distance that adjacent links are kept at.
    pub link_separation: f64,
    /// Strength of gravity. Positive values pull links towards negative y.
    pub gravity_scale: f64,
    /// Restitution used when a link bounces off an obstacle, in [0, 1].
    pub ground_bounce: f64,
    /// Multiplier applied to the implied velocity every integration step, in (0, 1].
    pub drag: f64,
    pub constraint_iterations: usize,
    pub substeps: usize,
    pub heavy_tail: Option<HeavyTail>,
    /// The chain reports being in tension when half of the last pair's correction
    /// in a constraint pass is larger than this.
    pub tension_threshold: f64,
    /// Layers of the environment that links collide with.
    pub collision_layers: LayerMask,
    /// Split constraint corrections by inverse mass instead of evenly.
    pub mass_weighted_constraints: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            num_links: 10,
            link_radius: 0.1,
            link_mass: 1.0,
            link_separation: 0.25,
            gravity_scale: 0.0,
            ground_bounce: 0.5,
            drag: 0.9,
            constraint_iterations: 10,
            substeps: 1,
            heavy_tail: None,
            tension_threshold: 1e-4,
            collision_layers: LayerMask::ALL,
            mass_weighted_constraints: false,
        }
    }
}

/// Reasons a [`ChainConfig`][self::ChainConfig] can be rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("A chain needs at least one link")]
    NoLinks,
    #[error("Link radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("Link mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    #[error("Link separation must be positive and finite, got {0}")]
    InvalidSeparation(f64),
    #[error("Drag must be in (0, 1], got {0}")]
    InvalidDrag(f64),
    #[error("Ground bounce must be in [0, 1], got {0}")]
    InvalidBounce(f64),
    #[error("Gravity scale must be finite, got {0}")]
    InvalidGravity(f64),
    #[error("Constraint iterations must be at least 1")]
    NoConstraintIterations,
    #[error("Substeps must be at least 1")]
    NoSubsteps,
    #[error("Tension threshold must be positive and finite, got {0}")]
    InvalidTensionThreshold(f64),
    #[error("Expected {expected} link positions, got {got}")]
    PositionCountMismatch { expected: usize, got: usize },
    #[error("Link count can't change after creation (was {current}, new config has {requested})")]
    LinkCountChanged { current: usize, requested: usize },
}

fn positive_finite(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

impl ChainConfig {
    /// Check that every parameter is in its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_links == 0 {
            return Err(ConfigError::NoLinks);
        }
        if !positive_finite(self.link_radius) {
            return Err(ConfigError::InvalidRadius(self.link_radius));
        }
        if !positive_finite(self.link_mass) {
            return Err(ConfigError::InvalidMass(self.link_mass));
        }
        if let Some(tail) = self.heavy_tail {
            if !positive_finite(tail.radius) {
                return Err(ConfigError::InvalidRadius(tail.radius));
            }
            if !positive_finite(tail.mass) {
                return Err(ConfigError::InvalidMass(tail.mass));
            }
        }
        if !positive_finite(self.link_separation) {
            return Err(ConfigError::InvalidSeparation(self.link_separation));
        }
        if !(self.drag > 0.0 && self.drag <= 1.0) {
            return Err(ConfigError::InvalidDrag(self.drag));
        }
        if !(0.0..=1.0).contains(&self.ground_bounce) {
            return Err(ConfigError::InvalidBounce(self.ground_bounce));
        }
        if !self.gravity_scale.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity_scale));
        }
        if self.constraint_iterations == 0 {
            return Err(ConfigError::NoConstraintIterations);
        }
        if self.substeps == 0 {
            return Err(ConfigError::NoSubsteps);
        }
        if !positive_finite(self.tension_threshold) {
            return Err(ConfigError::InvalidTensionThreshold(self.tension_threshold));
        }
        Ok(())
    }

    /// Mass and radius of the link at `idx`, accounting for a heavy tail.
    pub fn link_properties(&self, idx: usize) -> (f64, f64) {
        match self.heavy_tail {
            Some(tail) if idx + 1 == self.num_links => (tail.mass, tail.radius),
            _ => (self.link_mass, self.link_radius),
        }
    }

    pub fn with_num_links(mut self, num_links: usize) -> Self {
        self.num_links = num_links;
        self
    }

    pub fn with_link_radius(mut self, radius: f64) -> Self {
        self.link_radius = radius;
        self
    }

    pub fn with_link_mass(mut self, mass: f64) -> Self {
        self.link_mass = mass;
        self
    }

    pub fn with_link_separation(mut self, separation: f64) -> Self {
        self.link_separation = separation;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f64) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_ground_bounce(mut self, bounce: f64) -> Self {
        self.ground_bounce = bounce;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_constraint_iterations(mut self, iterations: usize) -> Self {
        self.constraint_iterations = iterations;
        self
    }

    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_heavy_tail(mut self, mass: f64, radius: f64) -> Self {
        self.heavy_tail = Some(HeavyTail { mass, radius });
        self
    }

    pub fn with_tension_threshold(mut self, threshold: f64) -> Self {
        self.tension_threshold = threshold;
        self
    }

    pub fn with_collision_layers(mut self, layers: LayerMask) -> Self {
        self.collision_layers = layers;
        self
    }

    pub fn with_mass_weighted_constraints(mut self, enabled: bool) -> Self {
        self.mass_weighted_constraints = enabled;
        self
    }
}

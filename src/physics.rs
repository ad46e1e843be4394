//! Verlet simulation of link chains colliding with an environment of circles and rectangles.
//!
//! Every tick runs in three phases:
//! integration (with swept collision to keep fast links from tunneling),
//! constraint passes that pin the head and keep links at their separation,
//! and discrete collision passes that push links out of obstacles.

pub mod collision;
pub use collision::{
    Circle, Environment, LayerMask, NoEnvironment, Obstacle, ObstacleKey, ObstacleSet,
    OverlapQuery, Rect, SweepHit, SweepQuery,
};

mod config;
pub use config::{ChainConfig, ConfigError, HeavyTail};

mod chain;
pub use chain::{Chain, Link};

mod chain_set;
pub use chain_set::{ChainKey, ChainSet};

mod simulation;
pub use simulation::Simulation;

mod constraint;
mod integrator;
mod resolver;
pub use resolver::PUSH_OUT_OVERSHOOT;

//! Verlet particle chains: ropes, tails and tentacles that trail behind an anchor point
//! and collide with circles and rectangles in their surroundings.
//!
//! ```
//! use verlet_chain::{ChainConfig, NoEnvironment, Simulation, Vec2};
//!
//! let config = ChainConfig::default().with_num_links(3).with_link_separation(1.0);
//! let mut sim = Simulation::new(config, NoEnvironment).unwrap();
//! sim.set_head_anchor(Vec2::zero());
//! sim.step(1.0 / 60.0);
//! assert_eq!(sim.link_positions()[0], Vec2::zero());
//! ```

/// Open a profiling span that lasts until the returned guard is dropped.
/// Does nothing unless the `tracy` feature is enabled and a profiler is connected.
macro_rules! tracy_span {
    ($name:expr, $fn_name:expr) => {
        tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0))
    };
}

pub mod math;
pub use math::{uv, Unit, Vec2};

pub mod physics;
pub use physics::{
    collision::{self, Circle, Contact, LayerMask, Obstacle, ObstacleSet, Rect},
    Chain, ChainConfig, ChainKey, ChainSet, ConfigError, Environment, HeavyTail, Link,
    NoEnvironment, Simulation,
};

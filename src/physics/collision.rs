pub mod shape;
pub use shape::{CastHit, Circle, Rect};

mod obstacle;
pub use obstacle::{Contact, LayerMask, Obstacle, ObstacleShape, DEFAULT_LAYER};

mod obstacle_set;
pub use obstacle_set::{ObstacleKey, ObstacleSet};

pub mod query;
pub use query::{Environment, NoEnvironment, OverlapQuery, SweepHit, SweepQuery};

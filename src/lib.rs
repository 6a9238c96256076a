//! Flappy Bird style game core.
//!
//! A bird falls under gravity, the player jumps, obstacle pairs scroll in
//! from the right and a collision ends the run. The [`Game`] state machine
//! drives everything from a virtual-time [`Scheduler`] so the whole update
//! loop is deterministic given a random source.

pub mod collision;
pub mod config;
pub mod error;
pub mod game;
pub mod obstacles;
pub mod physics;
pub mod render;
pub mod scheduler;

pub use collision::{Collision, Rect};
pub use config::{FieldSize, Tuning};
pub use error::ConfigError;
pub use game::{BirdPose, Game, GameEvent, Phase};
pub use obstacles::{Obstacle, ObstacleId, Obstacles};
pub use physics::Bird;
pub use scheduler::{Scheduler, Task, TaskHandle};

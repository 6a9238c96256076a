//! Per-tick collision tests and score bookkeeping.

use crate::config::{FieldSize, Tuning};
use crate::obstacles::{Obstacle, ObstacleId, Obstacles};
use crate::physics::Bird;

/// Axis-aligned rectangle, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap on all four sides; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// What ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ceiling,
    Ground,
    Obstacle(ObstacleId),
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub scored: u32,
    pub collision: Option<Collision>,
}

pub fn bird_rect(bird: &Bird, tuning: &Tuning) -> Rect {
    Rect::new(tuning.bird_x, bird.y, tuning.bird_width, tuning.bird_height)
}

/// Top and bottom segment of an obstacle.
pub fn obstacle_rects(obstacle: &Obstacle, field: FieldSize, tuning: &Tuning) -> (Rect, Rect) {
    let top = Rect::new(
        obstacle.x,
        0.0,
        tuning.obstacle_width,
        obstacle.gap_height,
    );
    let bottom_y = obstacle.gap_height + tuning.gap_size;
    let bottom = Rect::new(
        obstacle.x,
        bottom_y,
        tuning.obstacle_width,
        field.height - bottom_y - tuning.ground_height,
    );
    (top, bottom)
}

/// Ceiling or ground contact.
pub fn check_bounds(bird: &Bird, field: FieldSize, tuning: &Tuning) -> Option<Collision> {
    if bird.y + tuning.bird_height >= field.height - tuning.ground_height {
        Some(Collision::Ground)
    } else if bird.y <= 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// First obstacle, in spawn order, the bird overlaps.
pub fn check_obstacles(
    bird: &Bird,
    obstacles: &Obstacles,
    field: FieldSize,
    tuning: &Tuning,
) -> Option<Collision> {
    let bird = bird_rect(bird, tuning);
    obstacles
        .iter()
        .find(|obstacle| {
            let (top, bottom) = obstacle_rects(obstacle, field, tuning);
            bird.overlaps(&top) || bird.overlaps(&bottom)
        })
        .map(|obstacle| Collision::Obstacle(obstacle.id))
}

/// Scores every obstacle past the trigger, then looks for a terminal hit.
/// Scoring does not depend on the collision outcome of the same tick.
pub fn evaluate(
    bird: &Bird,
    obstacles: &mut Obstacles,
    field: FieldSize,
    tuning: &Tuning,
) -> Evaluation {
    let scored = obstacles.mark_passed(tuning.score_trigger_x);
    let collision = check_bounds(bird, field, tuning)
        .or_else(|| check_obstacles(bird, obstacles, field, tuning));
    Evaluation { scored, collision }
}

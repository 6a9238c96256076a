//! Game lifecycle: Idle -> Running -> Over -> Running ...
//!
//! [`Game`] owns every piece of mutable state and hands it by reference to the
//! physics, obstacle and collision steps. Updates only happen while
//! [`Phase::Running`]; leaving that phase cancels every scheduled task.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::collision::{self, Collision};
use crate::config::{FieldSize, Tuning};
use crate::error::ConfigError;
use crate::obstacles::{ObstacleId, Obstacles};
use crate::physics::Bird;
use crate::scheduler::{Scheduler, Task, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Over,
}

/// Visual state of the bird for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdPose {
    Resting,
    /// Raised by a jump, lowered by a timer shortly after.
    Jumping,
    /// The run has ended.
    Falling,
}

/// Notable things that happened during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned(ObstacleId),
    Scored { score: u32 },
    Crashed { cause: Collision, score: u32 },
}

/// Handles of the tasks that belong to the current run.
#[derive(Debug, Default)]
struct RunTasks {
    frame: Option<TaskHandle>,
    spawner: Option<TaskHandle>,
    bootstrap: Option<TaskHandle>,
    impulse: Option<TaskHandle>,
}

impl RunTasks {
    fn cancel_all(&mut self, scheduler: &mut Scheduler) {
        let handles = [
            self.frame.take(),
            self.spawner.take(),
            self.bootstrap.take(),
            self.impulse.take(),
        ];
        for handle in handles.into_iter().flatten() {
            scheduler.cancel(handle);
        }
    }
}

pub struct Game<R> {
    tuning: Tuning,
    field: FieldSize,
    phase: Phase,
    bird: Bird,
    obstacles: Obstacles,
    score: u32,
    /// Distance scrolled during the current run.
    distance: f64,
    pose: BirdPose,
    scheduler: Scheduler,
    tasks: RunTasks,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Fails when `tuning` does not pass [`Tuning::validate`].
    pub fn new(tuning: Tuning, field: FieldSize, rng: R) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let bird = Bird::at(tuning.bird_start_y(field));
        Ok(Self {
            tuning,
            field,
            phase: Phase::Idle,
            bird,
            obstacles: Obstacles::new(),
            score: 0,
            distance: 0.0,
            pose: BirdPose::Resting,
            scheduler: Scheduler::new(),
            tasks: RunTasks::default(),
            rng,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// How far the world has scrolled this run, in field pixels.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn pose(&self) -> BirdPose {
        self.pose
    }

    /// The short-lived flag raised by a jump.
    pub fn impulse_active(&self) -> bool {
        self.pose == BirdPose::Jumping
    }

    /// Field size as last sampled.
    pub fn field(&self) -> FieldSize {
        self.field
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Starts a fresh run from Idle or Over. Returns `false` (and does
    /// nothing) while a run is already going.
    pub fn start(&mut self, field: FieldSize) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        self.tasks.cancel_all(&mut self.scheduler);
        self.field = field;
        self.bird = Bird::at(self.tuning.bird_start_y(field));
        self.obstacles.clear();
        self.score = 0;
        self.distance = 0.0;
        self.pose = BirdPose::Resting;
        self.phase = Phase::Running;

        self.tasks.frame = Some(self.scheduler.every_frame(Task::Frame));
        self.tasks.spawner = Some(self.scheduler.every(Task::Spawn, self.tuning.spawn_interval));
        self.tasks.bootstrap = Some(
            self.scheduler
                .after(Task::BootstrapSpawn, self.tuning.bootstrap_delay),
        );

        info!(
            width = field.width,
            height = field.height,
            bird_y = self.bird.y,
            "run started"
        );
        true
    }

    /// Upward impulse. Ignored unless Running.
    pub fn jump(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        self.bird.jump(self.tuning.jump_velocity);
        self.pose = BirdPose::Jumping;
        if let Some(handle) = self.tasks.impulse.take() {
            self.scheduler.cancel(handle);
        }
        self.tasks.impulse = Some(
            self.scheduler
                .after(Task::ClearImpulse, self.tuning.impulse_duration),
        );
        true
    }

    /// A pointer press: starts a run when Idle or Over, jumps when Running.
    pub fn press(&mut self, field: FieldSize) -> bool {
        match self.phase {
            Phase::Idle | Phase::Over => self.start(field),
            Phase::Running => self.jump(),
        }
    }

    /// Feeds `dt` of wall time to the scheduler and runs whatever became due.
    pub fn advance(&mut self, dt: Duration, field: FieldSize) -> Vec<GameEvent> {
        self.field = field;
        let mut events = Vec::new();
        for task in self.scheduler.advance(dt) {
            if self.phase != Phase::Running {
                break;
            }
            match task {
                Task::Frame => self.update(&mut events),
                Task::Spawn => {
                    let x = field.width - self.tuning.spawn_offset;
                    events.push(GameEvent::Spawned(self.spawn_at(x)));
                }
                Task::BootstrapSpawn => {
                    self.tasks.bootstrap = None;
                    let x = field.width - self.tuning.bootstrap_offset;
                    events.push(GameEvent::Spawned(self.spawn_at(x)));
                }
                Task::ClearImpulse => {
                    self.tasks.impulse = None;
                    if self.pose == BirdPose::Jumping {
                        self.pose = BirdPose::Resting;
                    }
                }
            }
        }
        events
    }

    /// A single frame update without touching the timers.
    pub fn tick(&mut self, field: FieldSize) -> Vec<GameEvent> {
        self.field = field;
        let mut events = Vec::new();
        if self.phase == Phase::Running {
            self.update(&mut events);
        }
        events
    }

    fn spawn_at(&mut self, x: f64) -> ObstacleId {
        let range = self.tuning.gap_height_range(self.field);
        self.obstacles.spawn(x, range, &mut self.rng)
    }

    // physics -> obstacles -> collision/scoring -> transition
    fn update(&mut self, events: &mut Vec<GameEvent>) {
        let floor = self.tuning.bird_floor(self.field);
        self.bird.step(self.tuning.gravity, floor);

        self.obstacles.advance(self.tuning.scroll_speed);
        self.distance += self.tuning.scroll_speed;
        self.obstacles.retire(self.tuning.obstacle_width);

        let eval = collision::evaluate(&self.bird, &mut self.obstacles, self.field, &self.tuning);
        if eval.scored > 0 {
            self.score += eval.scored;
            debug!(score = self.score, "obstacle passed");
            events.push(GameEvent::Scored { score: self.score });
        }
        trace!(
            y = self.bird.y,
            velocity = self.bird.velocity,
            obstacles = self.obstacles.len(),
            "tick"
        );

        if let Some(cause) = eval.collision {
            self.finish(cause);
            events.push(GameEvent::Crashed {
                cause,
                score: self.score,
            });
        }
    }

    fn finish(&mut self, cause: Collision) {
        self.phase = Phase::Over;
        self.pose = BirdPose::Falling;
        self.tasks.cancel_all(&mut self.scheduler);
        info!(score = self.score, ?cause, "game over");
    }
}

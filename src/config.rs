//! Game tuning and play-field dimensions.
//!
//! All distances are logical pixels, all speeds are per tick. Timers run on
//! wall-clock durations.

use std::time::Duration;

use crate::error::ConfigError;

/// Logical size of the play field, sampled from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSize {
    pub width: f64,
    pub height: f64,
}

impl FieldSize {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::NonFinite { name: "field size" });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::FieldTooSmall { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Every constant that shapes a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Velocity added per tick.
    pub gravity: f64,
    /// Velocity set by a jump (negative = upward). Not additive.
    pub jump_velocity: f64,
    /// Obstacle scroll per tick.
    pub scroll_speed: f64,

    pub bird_x: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    /// Bird restarts at `height / 2 - bird_start_offset`.
    pub bird_start_offset: f64,

    pub obstacle_width: f64,
    /// Vertical opening between the top and bottom segments.
    pub gap_size: f64,
    pub ground_height: f64,
    pub min_gap_height: f64,
    /// Largest gap height is `field height - gap_height_margin`.
    pub gap_height_margin: f64,
    /// An obstacle scores once its x drops below this.
    pub score_trigger_x: f64,

    pub spawn_interval: Duration,
    /// Periodic spawns appear this far left of the right edge.
    pub spawn_offset: f64,
    pub bootstrap_delay: Duration,
    pub bootstrap_offset: f64,
    /// How long the jump impulse flag stays raised.
    pub impulse_duration: Duration,
    pub frame_period: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_velocity: -8.0,
            scroll_speed: 5.0,

            bird_x: 80.0,
            bird_width: 60.0,
            bird_height: 48.0,
            bird_start_offset: 20.0,

            obstacle_width: 60.0,
            gap_size: 150.0,
            ground_height: 20.0,
            min_gap_height: 100.0,
            gap_height_margin: 250.0,
            score_trigger_x: 50.0,

            spawn_interval: Duration::from_millis(1500),
            spawn_offset: 300.0,
            bootstrap_delay: Duration::from_millis(100),
            bootstrap_offset: 400.0,
            impulse_duration: Duration::from_millis(200),
            frame_period: Duration::from_millis(16),
        }
    }
}

impl Tuning {
    /// Frame period for a target refresh rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        if fps > 0 {
            self.frame_period = Duration::from_secs_f64(1.0 / fps as f64);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("jump velocity", self.jump_velocity),
            ("scroll speed", self.scroll_speed),
            ("bird x", self.bird_x),
            ("bird start offset", self.bird_start_offset),
            ("gap height margin", self.gap_height_margin),
            ("score trigger x", self.score_trigger_x),
            ("spawn offset", self.spawn_offset),
            ("bootstrap offset", self.bootstrap_offset),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }

        let positive = [
            ("gravity", self.gravity),
            ("scroll speed", self.scroll_speed),
            ("bird width", self.bird_width),
            ("bird height", self.bird_height),
            ("obstacle width", self.obstacle_width),
            ("gap size", self.gap_size),
            ("ground height", self.ground_height),
            ("min gap height", self.min_gap_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.jump_velocity >= 0.0 {
            return Err(ConfigError::JumpNotUpward {
                value: self.jump_velocity,
            });
        }

        let durations = [
            ("spawn interval", self.spawn_interval),
            ("impulse duration", self.impulse_duration),
            ("frame period", self.frame_period),
        ];
        for (name, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration { name });
            }
        }

        Ok(())
    }

    /// Lowest allowed vertical position for the bird's top edge.
    pub fn bird_floor(&self, field: FieldSize) -> f64 {
        (field.height - self.bird_height).max(0.0)
    }

    pub fn bird_start_y(&self, field: FieldSize) -> f64 {
        (field.height / 2.0 - self.bird_start_offset).clamp(0.0, self.bird_floor(field))
    }

    /// Half-open range of gap heights for a field, `[min, max)`.
    pub fn gap_height_range(&self, field: FieldSize) -> (f64, f64) {
        (
            self.min_gap_height,
            field.height - self.gap_height_margin,
        )
    }
}

//! Vertical motion of the bird.

/// Bird state. Horizontal position and size are fixed by `Tuning`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Top edge in pixels, 0 = top of the field.
    pub y: f64,
    /// Pixels per tick, positive = downward.
    pub velocity: f64,
}

impl Bird {
    pub fn at(y: f64) -> Self {
        Self { y, velocity: 0.0 }
    }

    /// Overrides the velocity with the impulse, whatever it was before.
    pub fn jump(&mut self, impulse: f64) {
        self.velocity = impulse;
    }

    /// One tick of integration: gravity, then position, then clamp to
    /// `[0, floor]`. Velocity is left untouched by the clamp and has no cap.
    pub fn step(&mut self, gravity: f64, floor: f64) {
        self.velocity += gravity;
        self.y = (self.y + self.velocity).clamp(0.0, floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_accumulates() {
        let mut bird = Bird::at(100.0);
        bird.step(0.5, 552.0);
        assert_eq!(bird.velocity, 0.5);
        assert_eq!(bird.y, 100.5);
        bird.step(0.5, 552.0);
        assert_eq!(bird.velocity, 1.0);
        assert_eq!(bird.y, 101.5);
    }

    #[test]
    fn test_jump_resets_velocity() {
        let mut bird = Bird::at(300.0);
        bird.velocity = 12.0;
        bird.jump(-8.0);
        assert_eq!(bird.velocity, -8.0);
        bird.jump(-8.0);
        assert_eq!(bird.velocity, -8.0);
    }

    #[test]
    fn test_clamp_keeps_velocity_growing() {
        let mut bird = Bird::at(550.0);
        for _ in 0..200 {
            bird.step(0.5, 552.0);
            assert!(bird.y >= 0.0 && bird.y <= 552.0);
        }
        // Pinned at the floor but velocity is never zeroed or capped.
        assert_eq!(bird.y, 552.0);
        assert_eq!(bird.velocity, 100.0);
    }

    #[test]
    fn test_clamp_at_ceiling() {
        let mut bird = Bird::at(3.0);
        bird.jump(-8.0);
        bird.step(0.5, 552.0);
        assert_eq!(bird.y, 0.0);
        assert_eq!(bird.velocity, -7.5);
    }
}

//! Spawning, scrolling and retiring obstacle pairs.

use rand::Rng;
use tracing::debug;

/// Unique token for an obstacle, never reused within a `Game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

/// A top and bottom segment with a gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge, decreasing every tick.
    pub x: f64,
    /// Height of the top segment; the gap starts here.
    pub gap_height: f64,
    /// Already counted towards the score.
    pub passed: bool,
}

/// Live obstacles in spawn order, oldest (leftmost) first.
#[derive(Debug, Clone, Default)]
pub struct Obstacles {
    items: Vec<Obstacle>,
    next_id: u64,
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every obstacle. Ids keep counting up.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Appends an obstacle at `x` with a gap height drawn from `[min, max)`.
    /// An empty range falls back to `min`.
    pub fn spawn<R: Rng>(&mut self, x: f64, gap_range: (f64, f64), rng: &mut R) -> ObstacleId {
        let (min, max) = gap_range;
        let lo = min.floor() as i64;
        let hi = max.floor() as i64;
        let gap_height = if hi > lo {
            rng.gen_range(lo..hi) as f64
        } else {
            min
        };

        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.items.push(Obstacle {
            id,
            x,
            gap_height,
            passed: false,
        });
        debug!(id = id.0, x, gap_height, "obstacle spawned");
        id
    }

    /// Scrolls every obstacle left by `speed`.
    pub fn advance(&mut self, speed: f64) {
        for obstacle in &mut self.items {
            obstacle.x -= speed;
        }
    }

    /// Removes obstacles whose right edge has left the field (`x <= -width`).
    /// Returns how many were removed.
    pub fn retire(&mut self, width: f64) -> usize {
        let before = self.items.len();
        self.items.retain(|o| o.x > -width);
        let retired = before - self.items.len();
        if retired > 0 {
            debug!(retired, live = self.items.len(), "obstacles retired");
        }
        retired
    }

    /// Marks every unpassed obstacle left of `trigger_x` as passed and
    /// returns how many flipped.
    pub fn mark_passed(&mut self, trigger_x: f64) -> u32 {
        let mut count = 0;
        for obstacle in &mut self.items {
            if !obstacle.passed && obstacle.x < trigger_x {
                obstacle.passed = true;
                count += 1;
            }
        }
        count
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, x: f64, gap_height: f64) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.items.push(Obstacle {
            id,
            x,
            gap_height,
            passed: false,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_spawn_gap_within_range() {
        let mut obstacles = Obstacles::new();
        let mut rng = create_test_rng();
        for _ in 0..500 {
            obstacles.spawn(500.0, (100.0, 350.0), &mut rng);
        }
        for o in obstacles.iter() {
            assert!(o.gap_height >= 100.0 && o.gap_height < 350.0);
            assert_eq!(o.gap_height, o.gap_height.floor());
            assert!(!o.passed);
        }
    }

    #[test]
    fn test_spawn_empty_range_uses_min() {
        let mut obstacles = Obstacles::new();
        let mut rng = create_test_rng();
        obstacles.spawn(500.0, (100.0, 60.0), &mut rng);
        assert_eq!(obstacles.as_slice()[0].gap_height, 100.0);
    }

    #[test]
    fn test_spawn_with_zero_source_takes_min() {
        let mut obstacles = Obstacles::new();
        let mut rng = StepRng::new(0, 0);
        obstacles.spawn(500.0, (100.0, 350.0), &mut rng);
        assert_eq!(obstacles.as_slice()[0].gap_height, 100.0);
    }

    #[test]
    fn test_ids_unique_and_ordered() {
        let mut obstacles = Obstacles::new();
        let mut rng = create_test_rng();
        let a = obstacles.spawn(400.0, (100.0, 350.0), &mut rng);
        let b = obstacles.spawn(500.0, (100.0, 350.0), &mut rng);
        obstacles.clear();
        let c = obstacles.spawn(500.0, (100.0, 350.0), &mut rng);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_advance_and_retire_boundary() {
        let mut obstacles = Obstacles::new();
        obstacles.push_for_test(-50.0, 200.0);
        obstacles.push_for_test(0.0, 200.0);

        obstacles.advance(5.0);
        assert_eq!(obstacles.retire(60.0), 0);
        assert_eq!(obstacles.as_slice()[0].x, -55.0);

        obstacles.advance(5.0);
        // x == -60 means the right edge reached the left boundary.
        assert_eq!(obstacles.retire(60.0), 1);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.as_slice()[0].x, -10.0);
    }

    #[test]
    fn test_mark_passed_once() {
        let mut obstacles = Obstacles::new();
        obstacles.push_for_test(49.0, 200.0);
        obstacles.push_for_test(50.0, 200.0);
        obstacles.push_for_test(10.0, 200.0);

        assert_eq!(obstacles.mark_passed(50.0), 2);
        assert_eq!(obstacles.mark_passed(50.0), 0);
        obstacles.advance(1.0);
        assert_eq!(obstacles.mark_passed(50.0), 1);
        assert!(obstacles.iter().all(|o| o.passed));
    }
}

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use symbiotic_flappy::{Collision, FieldSize, Game, GameEvent, ObstacleId, Phase, Tuning};

fn field() -> FieldSize {
    FieldSize::new(800.0, 600.0).expect("valid field")
}

fn new_game(seed: u64) -> Game<ChaCha8Rng> {
    Game::new(Tuning::default(), field(), ChaCha8Rng::seed_from_u64(seed)).expect("valid tuning")
}

#[test]
fn one_spawn_interval_without_jumping() {
    let mut game = new_game(1);
    assert!(game.start(field()));

    // 15 frames of 100ms cover exactly one 1.5s spawn interval.
    let step = Duration::from_millis(100);
    let mut expected_y = game.bird().y;
    let mut expected_v = 0.0;
    for _ in 0..15 {
        game.advance(step, field());
        expected_v += 0.5;
        expected_y += expected_v;
    }

    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.bird().velocity, 0.5 * 15.0);
    assert_eq!(game.bird().y, expected_y);
    assert_eq!(game.bird().y, 340.0);

    // Bootstrap spawn at 100ms plus the first periodic spawn at 1500ms.
    let obstacles = game.obstacles().as_slice();
    assert_eq!(obstacles.len(), 2);
    assert_eq!(obstacles[0].x, 400.0 - 15.0 * 5.0);
    assert_eq!(obstacles[1].x, 500.0 - 5.0);
    assert!(obstacles[0].id < obstacles[1].id);
}

#[test]
fn stalled_frame_spawns_a_single_periodic_obstacle() {
    let mut game = new_game(6);
    game.start(field());
    game.advance(Duration::from_secs(15), field());

    let xs: Vec<f64> = game.obstacles().iter().map(|o| o.x).collect();
    assert_eq!(xs, vec![395.0, 495.0]);

    // The next periodic spawn is a full interval after the stall.
    game.advance(Duration::from_millis(1499), field());
    assert_eq!(game.obstacles().len(), 2);
    game.advance(Duration::from_millis(1), field());
    assert_eq!(game.obstacles().len(), 3);
}

#[test]
fn free_fall_ends_the_run_on_the_ground() {
    let mut game = new_game(2);
    game.start(field());

    let frame = Duration::from_millis(16);
    let mut crash = None;
    for _ in 0..200 {
        for event in game.advance(frame, field()) {
            if let GameEvent::Crashed { cause, .. } = event {
                crash = Some(cause);
            }
        }
        if game.phase() == Phase::Over {
            break;
        }
    }

    assert_eq!(crash, Some(Collision::Ground));
    assert!(game.bird().y + 48.0 >= 600.0 - 20.0);

    let score = game.score();
    let xs: Vec<f64> = game.obstacles().iter().map(|o| o.x).collect();
    let bird = *game.bird();
    for _ in 0..50 {
        assert!(game.advance(frame, field()).is_empty());
    }
    assert_eq!(game.score(), score);
    assert_eq!(game.obstacles().iter().map(|o| o.x).collect::<Vec<_>>(), xs);
    assert_eq!(*game.bird(), bird);
    assert_eq!(game.scheduler().pending(), 0);
}

#[test]
fn restart_resets_the_run() {
    let mut game = new_game(3);
    game.start(field());
    while game.phase() == Phase::Running {
        game.advance(Duration::from_millis(16), field());
    }
    assert_eq!(game.phase(), Phase::Over);
    assert!(!game.obstacles().is_empty());

    assert!(game.start(field()));
    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.score(), 0);
    assert!(game.obstacles().is_empty());
    assert_eq!(game.bird().y, 280.0);
    assert_eq!(game.bird().velocity, 0.0);
    assert_eq!(game.scheduler().pending(), 3);
}

#[test]
fn velocity_is_never_capped() {
    // A tall field keeps the bird airborne long enough to watch velocity.
    let tall = FieldSize::new(800.0, 100_000.0).expect("valid field");
    let mut game = Game::new(Tuning::default(), tall, ChaCha8Rng::seed_from_u64(4))
        .expect("valid tuning");
    game.start(tall);
    for tick in 1..=150 {
        game.tick(tall);
        assert_eq!(game.bird().velocity, 0.5 * tick as f64);
    }
    assert_eq!(game.phase(), Phase::Running);
}

#[test]
fn random_play_keeps_invariants() {
    let mut game = new_game(5);
    let mut input = ChaCha8Rng::seed_from_u64(99);
    let frame = Duration::from_millis(16);
    let lowest = 600.0 - 48.0;

    let mut runs = 0;
    let mut transitions = 0u32;
    let mut seen_passed: Vec<ObstacleId> = Vec::new();

    for _ in 0..5_000 {
        if game.phase() != Phase::Running {
            game.start(field());
            runs += 1;
            transitions = 0;
            seen_passed.clear();
        }
        if input.gen_bool(0.08) {
            assert!(game.jump());
            assert_eq!(game.bird().velocity, -8.0);
        }
        game.advance(frame, field());

        let y = game.bird().y;
        assert!((0.0..=lowest).contains(&y), "bird out of bounds: {y}");

        // Spawn order is kept and nothing lingers past the left edge.
        let obstacles = game.obstacles().as_slice();
        assert!(obstacles.windows(2).all(|w| w[0].id < w[1].id));
        assert!(obstacles.iter().all(|o| o.x > -60.0));

        // Passed flags never flip back; each flip is worth exactly one point.
        for id in &seen_passed {
            if let Some(o) = obstacles.iter().find(|o| o.id == *id) {
                assert!(o.passed);
            }
        }
        for o in obstacles.iter().filter(|o| o.passed) {
            if !seen_passed.contains(&o.id) {
                seen_passed.push(o.id);
                transitions += 1;
            }
        }
        assert_eq!(game.score(), transitions);
    }
    assert!(runs > 1);
}

//! Terminal front-end: input, frame pacing and presentation.
//!
//! Usage:
//!   symbiotic-flappy [--width 800] [--height 600] [--fps 60] [--seed N]
//!   RUST_LOG=debug symbiotic-flappy --log-file flappy.log

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use symbiotic_flappy::render::{Canvas, Renderer};
use symbiotic_flappy::{FieldSize, Game, Tuning};

#[derive(Parser, Debug)]
#[command(name = "symbiotic-flappy")]
#[command(about = "Flap between the pipes in your terminal")]
struct Args {
    /// Logical field width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Logical field height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for obstacle gaps; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Velocity gained per frame
    #[arg(long)]
    gravity: Option<f64>,

    /// Velocity set by a jump (negative is up)
    #[arg(long, allow_hyphen_values = true)]
    jump_velocity: Option<f64>,

    /// Obstacle scroll per frame
    #[arg(long)]
    scroll_speed: Option<f64>,

    /// Write logs here (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default().with_fps(self.fps);
        if let Some(gravity) = self.gravity {
            tuning.gravity = gravity;
        }
        if let Some(jump) = self.jump_velocity {
            tuning.jump_velocity = jump;
        }
        if let Some(speed) = self.scroll_speed {
            tuning.scroll_speed = speed;
        }
        tuning
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Leaves the alternate screen even when the loop bails out with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )
        .context("failed to set up terminal")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let tuning = args.tuning();
    let field = FieldSize::new(args.width, args.height).context("invalid field size")?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, fps = args.fps, "starting");

    let frame_dur = tuning.frame_period;
    let mut game = Game::new(tuning, field, rng).context("invalid tuning")?;

    let _guard = TerminalGuard::enter()?;
    run(&mut game, field, frame_dur)
}

fn run(game: &mut Game<StdRng>, field: FieldSize, frame_dur: Duration) -> Result<()> {
    let mut out = stdout();
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut canvas = Canvas::for_terminal(cols, rows);
    let mut renderer = Renderer::new();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up => {
                        game.jump();
                    }
                    KeyCode::Enter | KeyCode::Char('s') => {
                        game.start(field);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    game.press(field);
                }
                Event::Resize(c, r) => canvas.resize(c, r),
                _ => {}
            }
        }

        let now = Instant::now();
        game.advance(now - last, field);
        last = now;

        renderer.draw(&mut canvas, game);
        canvas.present(&mut out).context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

//! Terminal presentation.
//!
//! Draws the game into a pixel canvas where each terminal cell holds two
//! vertically stacked pixels (`▀` with separate fg/bg colors). Logical field
//! coordinates are scaled onto whatever size the terminal has.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use rand::Rng;

use crate::collision::{self, Rect};
use crate::config::FieldSize;
use crate::game::{BirdPose, Game, Phase};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const HILLS: Rgb = Rgb(110, 190, 70);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_EDGE: Rgb = Rgb(74, 122, 26);
const PIPE_BODY: Rgb = Rgb(100, 170, 40);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const PANEL: Rgb = Rgb(220, 195, 120);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Canvas ──────────────────────────────────────────────────────────────────

pub struct Canvas {
    w: usize,
    /// Pixel rows, twice the terminal rows.
    h: usize,
    px: Vec<Rgb>,
}

impl Canvas {
    /// Canvas covering `cols` x `rows` terminal cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.w = cols as usize;
        self.h = rows as usize * 2;
        self.px.resize(self.w * self.h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Writes the whole canvas, only emitting color changes when needed.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?;
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── Field to canvas mapping ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Projection {
    sx: f64,
    sy: f64,
}

impl Projection {
    fn new(canvas: &Canvas, field: FieldSize) -> Self {
        Self {
            sx: canvas.w as f64 / field.width,
            sy: canvas.h as f64 / field.height,
        }
    }

    fn x(&self, x: f64) -> i32 {
        (x * self.sx).round() as i32
    }

    fn y(&self, y: f64) -> i32 {
        (y * self.sy).round() as i32
    }

    /// Pixel-space `(x, y, w, h)`, never thinner than one pixel.
    fn rect(&self, r: Rect) -> (i32, i32, i32, i32) {
        let x0 = self.x(r.x);
        let y0 = self.y(r.y);
        let x1 = self.x(r.x + r.width).max(x0 + 1);
        let y1 = self.y(r.y + r.height).max(y0 + 1);
        (x0, y0, x1 - x0, y1 - y0)
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_number(canvas: &mut Canvas, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, d) in s.bytes().map(|b| (b - b'0') as usize).enumerate() {
        let x = start_x + i as i32 * 4;
        for (cell, &on) in DIGITS[d].iter().enumerate() {
            if on == 1 {
                let (px, py) = (x + (cell % 3) as i32, y + (cell / 3) as i32);
                canvas.set(px + 1, py + 1, SHADOW);
                canvas.set(px, py, fg);
            }
        }
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draws frames of a [`Game`]. The background scrolls with the game's own
/// scrolled distance, so it moves per tick rather than per drawn frame.
#[derive(Debug, Default)]
pub struct Renderer {
    scroll: f64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw<R: Rng>(&mut self, canvas: &mut Canvas, game: &Game<R>) {
        if canvas.w == 0 || canvas.h == 0 {
            return;
        }
        self.scroll = game.distance();

        let field = game.field();
        let proj = Projection::new(canvas, field);
        let ground_y = proj.y(field.height - game.tuning().ground_height);

        self.draw_sky(canvas, ground_y);
        self.draw_hills(canvas, proj, ground_y);
        draw_obstacles(canvas, proj, game);
        self.draw_ground(canvas, proj, ground_y);
        draw_bird(canvas, proj, game);

        let cx = canvas.w as i32 / 2;
        match game.phase() {
            Phase::Idle => draw_title(canvas),
            Phase::Running => draw_number(canvas, cx, 2, game.score(), WHITE),
            Phase::Over => draw_game_over(canvas, game.score()),
        }
    }

    fn draw_sky(&self, canvas: &mut Canvas, ground_y: i32) {
        let sky_h = ground_y.max(1) as usize;
        for y in 0..sky_h.min(canvas.h) {
            let t = (y * 256 / sky_h) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..canvas.w {
                canvas.set(x as i32, y as i32, c);
            }
        }
    }

    fn draw_hills(&self, canvas: &mut Canvas, proj: Projection, ground_y: i32) {
        let amp = (proj.sy * 40.0).max(2.0);
        for x in 0..canvas.w as i32 {
            let fx = (x as f64 + self.scroll * proj.sx * 0.2) * 0.05;
            let h = (fx.sin() * 0.6 + (fx * 1.7).sin() * 0.4 + 1.2) * amp;
            let top = ground_y - h as i32;
            for y in top..ground_y {
                canvas.set(x, y, HILLS);
            }
        }
    }

    fn draw_ground(&self, canvas: &mut Canvas, proj: Projection, ground_y: i32) {
        let shift = (self.scroll * proj.sx) as i32;
        for x in 0..canvas.w as i32 {
            let alt = ((x + shift) / 3) % 2 == 0;
            canvas.set(x, ground_y, if alt { GRASS } else { GRASS_LIGHT });
        }
        for y in (ground_y + 1)..canvas.h as i32 {
            for x in 0..canvas.w as i32 {
                let stripe = (x + shift + (y - ground_y) * 2) % 12 < 6;
                canvas.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 2 {
        return PIPE_BODY;
    }
    let t = (x * 256 / (total_w - 1)) as u16;
    if t < 96 {
        Rgb::lerp(PIPE_EDGE, PIPE_HI, t * 256 / 96)
    } else {
        Rgb::lerp(PIPE_HI, PIPE_EDGE, ((t - 96) * 256 / 160).min(256))
    }
}

fn draw_obstacles<R: Rng>(canvas: &mut Canvas, proj: Projection, game: &Game<R>) {
    let cap_h = (proj.sy * 24.0).max(1.0) as i32;
    let cap_extra = (proj.sx * 6.0).max(1.0) as i32;

    for obstacle in game.obstacles().iter() {
        let (top, bottom) = collision::obstacle_rects(obstacle, game.field(), game.tuning());
        let (tx, ty, tw, th) = proj.rect(top);
        let (bx, by, bw, bh) = proj.rect(bottom);

        for dx in 0..tw {
            let c = pipe_shade(dx, tw);
            canvas.fill(tx + dx, ty, 1, th, c);
            canvas.fill(bx + dx, by, 1, bh, c);
        }

        // Caps facing the gap.
        let cap_w = tw + cap_extra * 2;
        for dx in 0..cap_w {
            let c = pipe_shade(dx, cap_w);
            canvas.fill(tx - cap_extra + dx, ty + th - cap_h, 1, cap_h, c);
            canvas.fill(bx - cap_extra + dx, by, 1, cap_h, c);
        }
        canvas.fill(tx - cap_extra, ty + th - 1, cap_w, 1, CAP_DARK);
        canvas.fill(bx - cap_extra, by, cap_w, 1, CAP_DARK);
    }
}

fn draw_bird<R: Rng>(canvas: &mut Canvas, proj: Projection, game: &Game<R>) {
    let (x, y, w, h) = proj.rect(collision::bird_rect(game.bird(), game.tuning()));
    let pose = game.pose();

    canvas.fill(x, y, w, h, BIRD_BODY);
    canvas.fill(x + 1, y, (w - 2).max(1), 1, BIRD_HI);

    // Wing up while the impulse flag is raised.
    let wing_h = (h / 3).max(1);
    let wing_y = match pose {
        BirdPose::Jumping => y,
        BirdPose::Resting => y + h / 2 - wing_h / 2,
        BirdPose::Falling => y + h - wing_h,
    };
    canvas.fill(x, wing_y, (w / 3).max(1), wing_h, BIRD_WING);

    let eye = (w / 5).max(1);
    let ex = x + w - eye * 2;
    let ey = y + (h / 4).max(1) - 1;
    canvas.fill(ex, ey, eye + 1, eye, BIRD_EYE);
    if pose == BirdPose::Falling {
        // Crossed-out eye.
        canvas.set(ex, ey, BIRD_PUPIL);
        canvas.set(ex + eye, ey + eye - 1, BIRD_PUPIL);
    } else {
        canvas.set(ex + eye, ey + eye - 1, BIRD_PUPIL);
    }

    let beak_y = match pose {
        BirdPose::Falling => y + h * 2 / 3,
        _ => y + h / 2,
    };
    canvas.fill(x + w, beak_y, (w / 4).max(1), (h / 4).max(1), BIRD_BEAK);
}

fn draw_title(canvas: &mut Canvas) {
    let cx = canvas.w as i32 / 2;
    let cy = canvas.h as i32 / 4;
    let letters = 6;
    let char_w = (canvas.w as i32 / 16).clamp(3, 8);
    let char_h = char_w + 2;
    let sx = cx - letters * char_w / 2;

    for i in 0..letters {
        let bx = sx + i * char_w;
        canvas.fill(bx, cy, char_w - 1, char_h, BIRD_BODY);
        canvas.fill(bx, cy, char_w - 1, 1, BIRD_HI);
    }

    // Start hint as a row of dots.
    let hint_y = cy + char_h + 3;
    for i in 0..11 {
        if i != 5 {
            canvas.fill(cx - 22 + i * 4, hint_y, 3, 2, WHITE);
        }
    }
}

fn draw_game_over(canvas: &mut Canvas, score: u32) {
    for y in 0..canvas.h {
        for x in 0..canvas.w {
            let c = canvas.get(x, y).dim();
            canvas.set(x as i32, y as i32, c);
        }
    }

    let cx = canvas.w as i32 / 2;
    let cy = canvas.h as i32 / 2;
    let panel_w = (canvas.w as i32 / 3).max(20);
    let panel_h = (canvas.h as i32 / 3).max(12);
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;

    canvas.fill(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    canvas.fill(px, py, panel_w, panel_h, DIRT);
    canvas.fill(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);
    draw_number(canvas, cx, cy - 2, score, WHITE);
}

// SPDX-License-Identifier: MIT
//
// balls — truecolor balls bouncing off the screen edges. Each frame draws
// the old positions as `o`, moves, then draws the new ones as `O`.

use std::f64::consts::TAU;
use std::time::Duration;

use pants_term::{Color, Engine, Hooks};
use rand::Rng;

use super::quit_on_q;

struct Ball {
    hue: f64,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Ball {
    fn color(&self) -> pants_term::Result<Color> {
        let (r, g, b) = hsv_to_rgb(self.hue, 0.75, 0.75);
        let channel = |v: f64| (v * 256.0).floor() as i64;
        Color::try_rgb(channel(r), channel(g), channel(b))
    }

    /// Advance one step, reflecting off the edges of a `width × height`
    /// area.
    fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x >= width {
            self.x = width - 1.0;
            self.vx = -self.vx;
        }
        if self.x < 0.0 {
            self.x = 0.0;
            self.vx = -self.vx;
        }
        if self.y >= height {
            self.y = height - 1.0;
            self.vy = -self.vy;
        }
        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = -self.vy;
        }
    }
}

/// HSV (all in `0..=1`) to RGB (all in `0..=1`).
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = (h.fract() * 6.0).floor();
    let f = h.fract().mul_add(6.0, -h6);
    let p = v * (1.0 - s);
    let q = v * s.mul_add(-f, 1.0);
    let t = v * s.mul_add(-(1.0 - f), 1.0);
    match h6 as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

pub struct Balls {
    count: usize,
    balls: Vec<Ball>,
}

impl Balls {
    pub const fn new(count: usize) -> Self {
        Self {
            count,
            balls: Vec::new(),
        }
    }

    fn draw(engine: &mut Engine, ball: &Ball, ch: char) -> anyhow::Result<()> {
        engine.draw_char(
            ch,
            ball.x.floor() as i32,
            ball.y.floor() as i32,
            ball.color()?,
            Color::BLACK,
        )?;
        Ok(())
    }
}

impl Hooks for Balls {
    fn start(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        let mut rng = rand::rng();
        let (width, height) = (f64::from(engine.width()), f64::from(engine.height()));

        self.balls = (0..self.count)
            .map(|_| {
                let theta = rng.random::<f64>() * TAU;
                let speed = (rng.random::<f64>() * 3.0).max(1.0);
                Ball {
                    hue: rng.random(),
                    x: rng.random::<f64>() * width,
                    y: rng.random::<f64>() * height,
                    vx: theta.sin() * speed,
                    vy: theta.cos() * speed,
                }
            })
            .collect();

        for ball in &self.balls {
            Self::draw(engine, ball, 'O')?;
        }
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        engine.clear_screen()?;
        if quit_on_q(engine) {
            return Ok(());
        }

        let (width, height) = (f64::from(engine.width()), f64::from(engine.height()));
        for ball in &self.balls {
            Self::draw(engine, ball, 'o')?;
        }
        for ball in &mut self.balls {
            ball.step(width, height);
            Self::draw(engine, ball, 'O')?;
        }
        Ok(())
    }
}

// SPDX-License-Identifier: MIT
//
// box — a square of box-drawing characters that grows and shrinks around
// the middle of the screen with |sin(2t)|.

use std::time::{Duration, Instant};

use pants_term::{Color, Engine, Hooks};

use super::quit_on_q;

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

pub struct PulsingBox {
    /// Largest distance from the center to an edge.
    size: f64,
    started: Instant,
}

impl PulsingBox {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            started: Instant::now(),
        }
    }
}

/// Top-left and bottom-right corner coordinates (shared by both axes) for a
/// box on a `width × height` screen, `t` seconds in.
fn extent(width: u16, height: u16, size: f64, t: f64) -> (i32, i32) {
    let mid = f64::from(width.min(height) / 2);
    let d = (t * 2.0).sin().abs() * size;
    ((mid - d).floor() as i32, (mid + d).floor() as i32)
}

impl Hooks for PulsingBox {
    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        engine.clear_screen()?;
        engine.reset_cursor()?;
        if quit_on_q(engine) {
            return Ok(());
        }

        let t = self.started.elapsed().as_secs_f64();
        let (lo, hi) = extent(engine.width(), engine.height(), self.size, t);
        let (fg, bg) = (Color::WHITE, Color::BLACK);

        engine.draw_char(TOP_LEFT, lo, lo, fg, bg)?;
        engine.draw_char(TOP_RIGHT, hi, lo, fg, bg)?;
        engine.draw_char(BOTTOM_LEFT, lo, hi, fg, bg)?;
        engine.draw_char(BOTTOM_RIGHT, hi, hi, fg, bg)?;
        for i in lo + 1..hi {
            engine.draw_char(HORIZONTAL, i, lo, fg, bg)?;
            engine.draw_char(HORIZONTAL, i, hi, fg, bg)?;
            engine.draw_char(VERTICAL, lo, i, fg, bg)?;
            engine.draw_char(VERTICAL, hi, i, fg, bg)?;
        }
        Ok(())
    }
}

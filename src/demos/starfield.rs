// SPDX-License-Identifier: MIT
//
// starfield — stars fall at a speed set by their depth layer (1 is the
// nearest and fastest) and twinkle between a bright and a dim phase.

use std::time::Duration;

use pants_term::{Color, Engine, Hooks, NamedColor};
use rand::Rng;

use super::quit_on_q;

/// Star colors, repeated by how often each should appear.
const PALETTE: [NamedColor; 9] = [
    NamedColor::Red,
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Green,
    NamedColor::Green,
    NamedColor::Blue,
    NamedColor::Yellow,
    NamedColor::Yellow,
    NamedColor::Yellow,
];

struct Star {
    color: NamedColor,
    layer: u8,
    x: i32,
    y: f64,
}

impl Star {
    /// Glyph and color for this star in frame `clock`. Stars switch phase
    /// every ten frames, staggered by their index.
    fn look(&self, clock: u64, index: usize) -> (char, NamedColor) {
        if (clock + index as u64) / 10 % 2 == 0 {
            let ch = if self.layer > 3 { '.' } else { '*' };
            (ch, self.color.bright())
        } else {
            ('.', self.color)
        }
    }
}

pub struct Starfield {
    count: usize,
    stars: Vec<Star>,
}

impl Starfield {
    pub const fn new(count: usize) -> Self {
        Self {
            count,
            stars: Vec::new(),
        }
    }
}

impl Hooks for Starfield {
    fn start(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        let mut rng = rand::rng();
        let (width, height) = (i32::from(engine.width()), f64::from(engine.height()));
        self.stars = (0..self.count)
            .map(|_| Star {
                color: PALETTE[rng.random_range(0..PALETTE.len())],
                layer: rng.random_range(1..=7),
                x: rng.random_range(0..width),
                y: rng.random_range(0.0..height),
            })
            .collect();
        // Far layers first so near stars draw over them.
        self.stars.sort_by(|a, b| b.layer.cmp(&a.layer));
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        quit_on_q(engine);
        engine.clear_screen()?;

        let mut rng = rand::rng();
        let width = i32::from(engine.width());
        let height = f64::from(engine.height());
        let clock = engine.clock();

        for (i, star) in self.stars.iter_mut().enumerate() {
            star.y += 1.0 / f64::from(star.layer);
            if star.y >= height {
                star.y = 0.0;
                star.x = rng.random_range(0..width);
            }
            let (ch, color) = star.look(clock, i);
            engine.draw_char(ch, star.x, star.y.floor() as i32, color.into(), Color::BLACK)?;
        }
        Ok(())
    }
}

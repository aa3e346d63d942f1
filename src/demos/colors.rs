// SPDX-License-Identifier: MIT
//
// colors — one random glyph per frame, in a random pair of the 16 slots,
// somewhere in the top-left quarter of the screen.

use std::time::Duration;

use pants_term::{Engine, Hooks, NamedColor};
use rand::Rng;

use super::quit_on_q;

const GLYPHS: &[char] = &[
    '$', '#', '@', '!', '%', '^', '&', '*', '(', ')', '-', '_', '+', '=', '{', '}', '[', ']',
    '\\', '|', '>', '<',
];

pub struct Colors;

impl Hooks for Colors {
    fn start(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        engine.write("WATCH ME GO")?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        if quit_on_q(engine) {
            return Ok(());
        }

        let mut rng = rand::rng();
        let glyph = GLYPHS[rng.random_range(0..GLYPHS.len())];
        let x = rng.random_range(0..=i32::from(engine.width()) / 4);
        let y = rng.random_range(0..=i32::from(engine.height()) / 4);
        let fg = NamedColor::ALL[rng.random_range(0..NamedColor::ALL.len())];
        let bg = NamedColor::ALL[rng.random_range(0..NamedColor::ALL.len())];

        engine.draw_char(glyph, x, y, fg.into(), bg.into())?;
        Ok(())
    }
}

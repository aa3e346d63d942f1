// SPDX-License-Identifier: MIT
//
// ticker — marquee lines that rotate one character per frame, centered on
// the longest message. The character that starts each message is picked
// out so the loop seam is visible.

use std::time::Duration;

use pants_term::{Color, Engine, Hooks, NamedColor};

use super::quit_on_q;

const MESSAGES: [&str; 5] = [
    "THIS IS A SCHEDULED TEST. DO NOT BE ALARMED.    ",
    "DING DONG ",
    "Ansi. Pants. Ansi. Stance.",
    "WE GOT A CASE OF THE wahwahs   ",
    ":^)                ",
];

pub struct Ticker {
    lines: Vec<Vec<char>>,
}

impl Default for Ticker {
    fn default() -> Self {
        let printable: Vec<char> = (' '..='~').collect();
        let mut lines: Vec<Vec<char>> = MESSAGES.iter().map(|m| m.chars().collect()).collect();
        lines.insert(2, printable);
        Self { lines }
    }
}

/// `line` rotated left by `offset`, and the index the original first
/// character moved to.
fn rotate(line: &[char], offset: u64) -> (String, usize) {
    if line.is_empty() {
        return (String::new(), 0);
    }
    let len = line.len();
    let shift = (offset % len as u64) as usize;
    let rotated = line[shift..].iter().chain(&line[..shift]).collect();
    (rotated, (len - shift) % len)
}

impl Hooks for Ticker {
    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        if quit_on_q(engine) {
            return Ok(());
        }

        let clock = engine.clock();
        let center = self.lines.iter().map(Vec::len).max().unwrap_or(0) / 2;

        for (y, line) in self.lines.iter().enumerate() {
            let (text, seam) = rotate(line, clock);
            let mut fg = vec![Color::from(NamedColor::BrightGreen); line.len()];
            if let Some(c) = fg.get_mut(seam) {
                *c = NamedColor::BrightWhite.into();
            }
            let x = center as i32 - (line.len() / 2) as i32;
            engine.draw_str_colored(&text, x, y as i32, &fg, &[])?;
        }
        Ok(())
    }
}

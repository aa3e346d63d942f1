// SPDX-License-Identifier: MIT
//
// The demo registry.

// Demo math mixes float positions with integer cells throughout.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

mod balls;
mod boxes;
mod colors;
mod starfield;
mod ticker;

use std::time::Duration;

use pants_term::{Config, Engine};

/// One of the bundled demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Colors,
    Box,
    Starfield,
    Ticker,
    Balls,
}

impl Demo {
    pub const ALL: [Self; 5] = [
        Self::Colors,
        Self::Box,
        Self::Starfield,
        Self::Ticker,
        Self::Balls,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Box => "box",
            Self::Starfield => "starfield",
            Self::Ticker => "ticker",
            Self::Balls => "balls",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// The settings each demo was tuned for.
    pub fn config(self) -> Config {
        match self {
            // Stars land one flush at a time.
            Self::Starfield => Config::default().with_flush_always(true),
            Self::Ticker => Config::default().with_fps(15),
            Self::Colors | Self::Box | Self::Balls => Config::default(),
        }
    }

    /// Run the demo to completion.
    pub fn run(self, config: Config) -> pants_term::Result<()> {
        match self {
            Self::Colors => pants_term::run(config, &mut colors::Colors),
            Self::Box => pants_term::run(config, &mut boxes::PulsingBox::new(14.0)),
            Self::Starfield => pants_term::run(config, &mut starfield::Starfield::new(128)),
            Self::Ticker => pants_term::run(config, &mut ticker::Ticker::default()),
            Self::Balls => pants_term::run(config, &mut balls::Balls::new(30)),
        }
    }
}

/// Quit if `q` is waiting. Every demo checks this once per frame.
fn quit_on_q(engine: &mut Engine) -> bool {
    if engine.get_char(Duration::ZERO) == Some('q') {
        engine.quit();
        return true;
    }
    false
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Session configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::terminal::InputMode;

/// How a session runs.
///
/// The defaults suit the demos: 30 fps, cbreak input (Ctrl-C still works),
/// output flushed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Target frames per second. Must be positive.
    pub fps: u32,
    /// Raw mode instead of cbreak.
    pub raw_mode: bool,
    /// Flush after every draw call instead of once per frame.
    pub flush_always: bool,
    /// The key that dismisses the error overlay.
    pub ack_key: char,
    /// How long the error overlay waits for input between redraws.
    pub overlay_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            raw_mode: false,
            flush_always: false,
            ack_key: 'q',
            overlay_pause: Duration::from_millis(500),
        }
    }
}

impl Config {
    #[must_use]
    pub const fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    #[must_use]
    pub const fn with_raw_mode(mut self, raw: bool) -> Self {
        self.raw_mode = raw;
        self
    }

    #[must_use]
    pub const fn with_flush_always(mut self, on: bool) -> Self {
        self.flush_always = on;
        self
    }

    #[must_use]
    pub const fn with_ack_key(mut self, key: char) -> Self {
        self.ack_key = key;
        self
    }

    #[must_use]
    pub const fn with_overlay_pause(mut self, pause: Duration) -> Self {
        self.overlay_pause = pause;
        self
    }

    /// The terminal mode this config asks for.
    #[inline]
    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        if self.raw_mode {
            InputMode::Raw
        } else {
            InputMode::Cbreak
        }
    }

    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] for `fps == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::InvalidFrameRate(self.fps));
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

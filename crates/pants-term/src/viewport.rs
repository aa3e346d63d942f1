// SPDX-License-Identifier: MIT
//
// Viewport — terminal dimensions and canvas addressing.
//
// Callers address the canvas with signed, unbounded coordinates. Positions
// wrap around with a Euclidean remainder (never a truncating `%`), so `-1`
// is the last column and `width` is column 0 again. Strings do not wrap:
// whatever runs past the right edge is dropped.

use std::io::{self, Write};

use crate::ansi;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Number of columns. Never zero.
    pub width: u16,
    /// Number of rows. Never zero.
    pub height: u16,
}

impl Viewport {
    /// Used when the real size cannot be queried (pipes, tests).
    pub const FALLBACK: Self = Self {
        width: 80,
        height: 24,
    };

    /// A viewport of `width × height`. Zero dimensions are raised to 1 so
    /// wraparound is always defined.
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// Wrap an arbitrary position into the viewport.
    #[must_use]
    pub fn wrap(self, x: i32, y: i32) -> (u16, u16) {
        (wrap_axis(x, self.width), wrap_axis(y, self.height))
    }

    /// Write the absolute cursor position for `(x, y)` after wraparound.
    ///
    /// Returns the wrapped position.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn write_move_to(self, w: &mut impl Write, x: i32, y: i32) -> io::Result<(u16, u16)> {
        let (wx, wy) = self.wrap(x, y);
        ansi::cursor_to(w, wx, wy)?;
        Ok((wx, wy))
    }

    /// The cursor position fragment for `(x, y)` after wraparound.
    #[must_use]
    pub fn move_to(self, x: i32, y: i32) -> String {
        ansi::render(|w| self.write_move_to(w, x, y).map(|_| ()))
    }

    /// How many of `len` characters starting at column `x` stay on screen.
    ///
    /// The last drawable column is `width - 1`; anything past it is dropped.
    #[must_use]
    pub fn clip_len(self, x: u16, len: usize) -> usize {
        let room = usize::from(self.width.saturating_sub(x));
        len.min(room)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FALLBACK
    }
}

fn wrap_axis(v: i32, extent: u16) -> u16 {
    let wrapped = i64::from(v).rem_euclid(i64::from(extent.max(1)));
    // rem_euclid of a positive u16 extent is in [0, extent).
    u16::try_from(wrapped).unwrap_or(0)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

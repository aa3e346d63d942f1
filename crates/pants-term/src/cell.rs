// SPDX-License-Identifier: MIT
//
// Cell — one character and its two colors.
//
// Cells are transient. They exist to describe a grid for the baker or a
// single draw call; the engine never stores them. There is no attribute
// bitfield and no wide-character bookkeeping: one cell, one char, one column.

use std::fmt;
use std::io::{self, Write};

use crate::color::{self, Color};

/// A single character with foreground and background colors.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character to display.
    pub ch: char,
    /// Text color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Cell {
    /// A blank cell: space, white on black.
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: Color::WHITE,
        bg: Color::BLACK,
    };

    /// A cell with the default white-on-black colors.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }

    /// A cell with explicit colors.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Write the color pair followed by the character.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn write_to(self, w: &mut impl Write) -> io::Result<()> {
        color::write_pair(w, self.fg, self.bg)?;
        let mut enc = [0u8; 4];
        w.write_all(self.ch.encode_utf8(&mut enc).as_bytes())
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::BLANK
    }
}

impl From<char> for Cell {
    fn from(ch: char) -> Self {
        Self::new(ch)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({:?} {} on {})", self.ch, self.fg, self.bg)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

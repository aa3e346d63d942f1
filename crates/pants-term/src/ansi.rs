// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. The engine decides that; this module only
// knows the byte-level encoding of every terminal command we need.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed for
// the terminal (CUP is 1-based, row first).
//
// All functions return `io::Result` propagated from the underlying writer.
// Writing into a `Vec<u8>` never fails, which is what [`render`] relies on.

use std::io::{self, Write};

// ─── Fixed Fragments ────────────────────────────────────────────────────────

/// Reset all SGR attributes (SGR 0).
pub const RESET: &str = "\x1b[0m";

/// Clear the entire screen (ED 2).
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Move the cursor to the top-left corner (HVP with no parameters).
pub const HOME: &str = "\x1b[f";

/// Hide the cursor (DECTCEM reset).
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show the cursor (DECTCEM set).
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Carriage return plus line feed.
///
/// Always the explicit pair: a bare `\n` in raw mode moves down without
/// returning to column 0, and in cooked output it depends on `OPOST`.
pub const LINE_SET: &str = "\r\n";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor right by `n` columns (CUF).
///
/// Emits nothing for `n == 0`: terminals treat `CSI 0 C` as `CSI 1 C`.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor to the origin.
#[inline]
pub fn home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(HOME.as_bytes())
}

/// Hide the cursor.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_HIDE.as_bytes())
}

/// Show the cursor.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_SHOW.as_bytes())
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_SCREEN.as_bytes())
}

/// Reset all SGR attributes to terminal defaults.
///
/// Clears everything: colors and any styling flags a previous draw left on.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET.as_bytes())
}

/// Carriage return + line feed.
#[inline]
pub fn line_set(w: &mut impl Write) -> io::Result<()> {
    w.write_all(LINE_SET.as_bytes())
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A single basic SGR color code (30–37, 90–97, 40–47, 100–107).
#[inline]
pub fn sgr(w: &mut impl Write, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{code}m")
}

/// 24-bit foreground color.
#[inline]
pub fn fg_rgb(w: &mut impl Write, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

/// 24-bit background color.
#[inline]
pub fn bg_rgb(w: &mut impl Write, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

// ─── Fragments ───────────────────────────────────────────────────────────────

/// Run an emitter against a scratch buffer and return what it wrote.
///
/// Every sequence in this module is ASCII, and callers only add whole
/// `char`s, so the buffer is always valid UTF-8.
pub fn render<F>(f: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::with_capacity(32);
    if f(&mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

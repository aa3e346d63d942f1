// SPDX-License-Identifier: MIT
//
// Color resolution — semantic color requests to SGR fragments.
//
// A color is either one of the 16 named slots every terminal understands, or
// a 24-bit RGB triple routed to the truecolor sequences. Both live in one
// tagged type, so there is no separate "RGB mode" flag anywhere in the API:
// the variant says which encoding to use.
//
// Named slots (fixed order, the index is the slot number):
//
//   0 black   1 red     2 green   3 yellow   4 blue   5 magenta   6 cyan   7 white
//   8–15      the same eight with a `b_` prefix (bright)
//
// Encoding:
//
//   slot 0–7    fg 30–37    bg 40–47
//   slot 8–15   fg 90–97    bg 100–107
//   RGB         fg 38;2;r;g;b   bg 48;2;r;g;b
//
// A color pair always starts with SGR 0. Terminals apply SGR cumulatively,
// so without the reset a style from the previous draw call bleeds through.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::ansi;
use crate::error::{Error, Result};

// ─── Layer ───────────────────────────────────────────────────────────────────

/// Which half of a cell a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Text color.
    Foreground,
    /// Cell background.
    Background,
}

// ─── NamedColor ──────────────────────────────────────────────────────────────

/// The slot names, in slot order.
const NAMES: [&str; 16] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
    "b_black", "b_red", "b_green", "b_yellow", "b_blue", "b_magenta", "b_cyan", "b_white",
];

/// One of the 16 basic terminal color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// All slots in slot order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::BrightBlack,
        Self::BrightRed,
        Self::BrightGreen,
        Self::BrightYellow,
        Self::BrightBlue,
        Self::BrightMagenta,
        Self::BrightCyan,
        Self::BrightWhite,
    ];

    /// Slot number, 0–15.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The slot's name (`"red"`, `"b_cyan"`, ...).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Whether this is one of the eight bright slots.
    #[inline]
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.index() >= 8
    }

    /// The bright counterpart of a base slot. Bright slots map to themselves.
    #[inline]
    #[must_use]
    pub const fn bright(self) -> Self {
        Self::ALL[(self.index() | 8) as usize]
    }

    /// The SGR code for this slot on the given layer.
    #[must_use]
    pub const fn code(self, layer: Layer) -> u8 {
        let i = self.index();
        match (layer, self.is_bright()) {
            (Layer::Foreground, false) => 30 + i,
            (Layer::Foreground, true) => 90 + (i - 8),
            (Layer::Background, false) => 40 + i,
            (Layer::Background, true) => 100 + (i - 8),
        }
    }

    /// Look a slot up by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColorName`] if `name` is not one of the 16 slot names.
    pub fn from_name(name: &str) -> Result<Self> {
        NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| Error::UnknownColorName(name.to_owned()))
    }
}

impl FromStr for NamedColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A color request: a named slot or a truecolor triple.
///
/// # Examples
///
/// ```
/// use pants_term::color::{Color, Layer, NamedColor};
///
/// let red: Color = "red".parse().unwrap();
/// assert_eq!(red, Color::Named(NamedColor::Red));
/// assert_eq!(red.resolve(Layer::Foreground), "\x1b[31m");
///
/// let orange = Color::rgb(255, 128, 0);
/// assert_eq!(orange.resolve(Layer::Background), "\x1b[48;2;255;128;0m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// One of the 16 basic slots.
    Named(NamedColor),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// The default foreground for draw calls.
    pub const WHITE: Self = Self::Named(NamedColor::White);

    /// The default background for draw calls.
    pub const BLACK: Self = Self::Named(NamedColor::Black);

    /// A truecolor value.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }

    /// A truecolor value from unchecked integers (e.g. computed from floats).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorComponent`] naming the first channel outside
    /// `0..=255`.
    pub fn try_rgb(r: i64, g: i64, b: i64) -> Result<Self> {
        let channel = |name: char, value: i64| {
            u8::try_from(value).map_err(|_| Error::InvalidColorComponent {
                channel: name,
                value,
            })
        };
        Ok(Self::Rgb(channel('r', r)?, channel('g', g)?, channel('b', b)?))
    }

    /// Write this color's escape fragment for `layer`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn write_plate(self, w: &mut impl Write, layer: Layer) -> io::Result<()> {
        match (self, layer) {
            (Self::Named(n), _) => ansi::sgr(w, n.code(layer)),
            (Self::Rgb(r, g, b), Layer::Foreground) => ansi::fg_rgb(w, r, g, b),
            (Self::Rgb(r, g, b), Layer::Background) => ansi::bg_rgb(w, r, g, b),
        }
    }

    /// This color's escape fragment for `layer`.
    #[must_use]
    pub fn resolve(self, layer: Layer) -> String {
        ansi::render(|w| self.write_plate(w, layer))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<NamedColor> for Color {
    fn from(n: NamedColor) -> Self {
        Self::Named(n)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::Rgb(r, g, b)
    }
}

/// Parses a slot name (`"b_red"`) or a hex triple (`"#ff8000"`, `"#f80"`).
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('#') {
            return parse_hex(s).ok_or_else(|| Error::UnknownColorName(s.to_owned()));
        }
        NamedColor::from_name(s).map(Self::Named)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => f.write_str(n.name()),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ─── Pairs ───────────────────────────────────────────────────────────────────

/// Write a full color pair: reset, then foreground, then background.
///
/// # Errors
///
/// Propagates writer errors.
pub fn write_pair(w: &mut impl Write, fg: Color, bg: Color) -> io::Result<()> {
    ansi::reset(w)?;
    fg.write_plate(w, Layer::Foreground)?;
    bg.write_plate(w, Layer::Background)
}

/// A full color pair fragment (a "plate").
#[must_use]
pub fn pair(fg: Color, bg: Color) -> String {
    ansi::render(|w| write_pair(w, fg, bg))
}

// ─── PlateCache ──────────────────────────────────────────────────────────────

/// Memoized color pair fragments.
///
/// Resolution is a pure function of `(fg, bg)`, so a plate built once is
/// valid for the rest of the session.
#[derive(Debug, Default)]
pub struct PlateCache {
    plates: HashMap<(Color, Color), String>,
}

impl PlateCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The plate for `(fg, bg)`, built on first use.
    pub fn get(&mut self, fg: Color, bg: Color) -> &str {
        self.plates.entry((fg, bg)).or_insert_with(|| pair(fg, bg))
    }

    /// Number of distinct pairs built so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.plates.len()
    }

    /// Whether nothing has been cached yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

/// Parse `#RGB` or `#RRGGBB`.
fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    let bytes = hex.as_bytes();

    match bytes.len() {
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi * 16 + lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

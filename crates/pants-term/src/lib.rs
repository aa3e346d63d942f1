// SPDX-License-Identifier: MIT
//
// pants-term — the drawing engine behind ansi-pants.
//
// A small terminal engine that writes ANSI escape sequences straight to the
// output stream. There is no frame buffer and no diffing: every draw call
// emits its bytes immediately. What the engine does own is the hard part:
// exact escape encoding, a raw/cbreak session that is always torn down, and
// a fixed-rate frame loop that polls input without spinning.
//
// Module map, leaves first:
//
//   ansi      — byte-level escape sequence encoding
//   color     — named 16-slot and truecolor colors, plate cache
//   cell      — a character with its two colors
//   viewport  — coordinate wraparound and string clipping
//   bake      — grid of cells → one escape-laden string
//   output    — the output sink with flush-always mode
//   input     — single character polling over poll(2)
//   scheduler — frame throttle and frame clock
//   terminal  — termios backend and panic-safe restore
//   engine    — the handle hooks draw through
//   overlay   — the crash screen
//   signals   — SIGINT/SIGTERM routed into the session
//   session   — scoped lifecycle: enter, loop, teardown

pub mod ansi;
pub mod bake;
pub mod cell;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod overlay;
pub mod scheduler;
pub mod session;
pub mod signals;
pub mod terminal;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use cell::Cell;
pub use color::{Color, Layer, NamedColor};
pub use config::Config;
pub use engine::{Engine, Hooks};
pub use error::{Error, Result};
pub use overlay::FailureReport;
pub use session::{Session, SessionState, run, run_with};
pub use terminal::{InputMode, Tty};
pub use viewport::Viewport;

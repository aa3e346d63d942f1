// SPDX-License-Identifier: MIT
//
// Error overlay — the crash screen.
//
// When a hook fails (error or panic) the session stops ticking and hands the
// failure here. The overlay redraws a full-screen report, flashing between
// white-on-red and red-on-white with the wall clock's second, until the
// acknowledgment key arrives or a termination signal does. Then it clears the screen and returns; teardown
// follows. The session never goes back to ticking after this.
//
//   Oh no, ansi-pants encountered an error!
//   (three blank lines)
//   panic: index out of bounds
//     at src/main.rs:40:9
//   (three blank lines)
//   Press q to exit.

use std::fmt;
use std::io::{self, Write};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::ansi;
use crate::color::{Color, NamedColor, write_pair};
use crate::engine::Engine;
use crate::error::Result;
use crate::signals;
use crate::terminal::CaughtPanic;

const HEADER: &str = "Oh no, ansi-pants encountered an error!";

// ─── FailureReport ───────────────────────────────────────────────────────────

/// What went wrong inside a hook, as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// `"error"` for a returned error, `"panic"` for a panic.
    pub kind: String,
    /// The top-level message.
    pub message: String,
    /// Extra lines: the error's cause chain, or the panic location.
    pub context: Vec<String>,
}

impl FailureReport {
    /// Report for an error a hook returned. Each cause in the chain becomes
    /// one context line.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            kind: "error".to_owned(),
            message: err.to_string(),
            context: err
                .chain()
                .skip(1)
                .map(|cause| format!("caused by: {cause}"))
                .collect(),
        }
    }

    /// Report for a panic caught while a hook ran.
    #[must_use]
    pub fn from_panic(panic: &CaughtPanic) -> Self {
        Self {
            kind: "panic".to_owned(),
            message: panic.message.clone(),
            context: panic
                .location
                .iter()
                .map(|loc| format!("at {loc}"))
                .collect(),
        }
    }

    /// The report as display lines. Multi-line messages are split so each
    /// line can end in CR LF.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut message = self.message.lines();
        let first = message.next().unwrap_or_default();

        let mut out = vec![format!("{}: {first}", self.kind)];
        out.extend(message.map(str::to_owned));
        out.extend(
            self.context
                .iter()
                .flat_map(|c| c.lines())
                .map(|l| format!("  {l}")),
        );
        out
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for line in &self.context {
            write!(f, "; {line}")?;
        }
        Ok(())
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Whether the overlay is in its inverted phase at `now`: odd wall-clock
/// seconds swap the colors.
#[must_use]
pub fn flash_phase(now: SystemTime) -> bool {
    now.duration_since(UNIX_EPOCH)
        .is_ok_and(|d| d.as_secs() % 2 == 1)
}

/// Write one overlay frame.
///
/// # Errors
///
/// Propagates writer errors.
pub fn write_frame(
    w: &mut impl Write,
    report: &FailureReport,
    flash: bool,
    ack_key: char,
) -> io::Result<()> {
    let red = Color::from(NamedColor::Red);
    let (fg, bg) = if flash {
        (red, Color::WHITE)
    } else {
        (Color::WHITE, red)
    };

    write_pair(w, fg, bg)?;
    ansi::clear_screen(w)?;
    ansi::home(w)?;

    w.write_all(HEADER.as_bytes())?;
    ansi::line_set(w)?;
    blank_lines(w)?;
    for line in report.lines() {
        w.write_all(line.as_bytes())?;
        ansi::line_set(w)?;
    }
    blank_lines(w)?;
    write!(w, "Press {ack_key} to exit.")?;
    ansi::line_set(w)
}

fn blank_lines(w: &mut impl Write) -> io::Result<()> {
    for _ in 0..3 {
        ansi::line_set(w)?;
    }
    Ok(())
}

// ─── Overlay Loop ────────────────────────────────────────────────────────────

/// Show `report` until the acknowledgment key is pressed, then clear.
///
/// Between redraws the overlay waits on input for the configured pause. If
/// the input has hung up no key can ever arrive, so that counts as
/// acknowledgment.
///
/// # Errors
///
/// Output errors. The overlay itself never fails otherwise.
pub fn run(engine: &mut Engine, report: &FailureReport) -> Result<()> {
    let ack_key = engine.config().ack_key;
    let pause = engine.config().overlay_pause;

    loop {
        let flash = flash_phase(SystemTime::now());
        engine.emit_with(|w| write_frame(w, report, flash, ack_key))?;
        engine.flush()?;

        if wait_for_ack(engine, ack_key, Instant::now() + pause) {
            break;
        }
        if let Some(signal) = signals::pending() {
            debug!(signal, "termination signal received on the error overlay");
            break;
        }
    }

    engine.clear_screen()?;
    engine.flush()
}

/// Read keys until `deadline`. True once the ack key arrives or the input
/// hangs up.
fn wait_for_ack(engine: &Engine, ack_key: char, deadline: Instant) -> bool {
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        match engine.get_char(left) {
            Some(c) if c == ack_key => return true,
            Some(_) => {}
            None if engine.input().hung_up() => {
                warn!("input hung up while the error overlay was shown");
                return true;
            }
            None => return false,
        }
        if left.is_zero() {
            return false;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

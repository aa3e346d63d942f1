// SPDX-License-Identifier: MIT
//
// Engine errors.
//
// Color and grid errors surface at the call that produced them. A failing
// hook is the only error that changes session state: the session catches it,
// shows the overlay, and tears down.

use std::io;

use crate::overlay::FailureReport;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything the engine can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A color name that is not one of the 16 slots.
    #[error("unknown color name: {0:?}")]
    UnknownColorName(String),

    /// An RGB component outside `0..=255`.
    #[error("color component {channel} out of range 0-255: {value}")]
    InvalidColorComponent { channel: char, value: i64 },

    /// A grid (or parallel color table) with rows of unequal length.
    #[error("irregular grid: row {row} has {found} cells, expected {expected}")]
    IrregularGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The input stream is not a terminal device.
    #[error("input is not an interactive terminal")]
    TerminalNotInteractive,

    /// A hook returned an error or panicked while the session was active.
    #[error("uncaught failure in {}: {}", .0.kind, .0.message)]
    UncaughtCallbackFailure(FailureReport),

    /// A frame rate of zero.
    #[error("frame rate must be a positive integer, got {0}")]
    InvalidFrameRate(u32),

    /// SIGINT or SIGTERM ended the session. Teardown already ran.
    #[error("interrupted by signal {0}")]
    Interrupted(i32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_color_display() {
        let e = Error::UnknownColorName("mauve".into());
        assert_eq!(e.to_string(), "unknown color name: \"mauve\"");
    }

    #[test]
    fn component_display() {
        let e = Error::InvalidColorComponent {
            channel: 'g',
            value: 300,
        };
        assert_eq!(e.to_string(), "color component g out of range 0-255: 300");
    }

    #[test]
    fn irregular_grid_display() {
        let e = Error::IrregularGrid {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(
            e.to_string(),
            "irregular grid: row 2 has 3 cells, expected 4"
        );
    }

    #[test]
    fn interrupted_display() {
        assert_eq!(Error::Interrupted(2).to_string(), "interrupted by signal 2");
    }

    #[test]
    fn io_converts() {
        let e: Error = io::Error::other("boom").into();
        assert!(matches!(e, Error::Io(_)));
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn callback_failure_display() {
        let report = FailureReport {
            kind: "panic".into(),
            message: "index out of bounds".into(),
            context: vec!["src/main.rs:10:5".into()],
        };
        let e = Error::UncaughtCallbackFailure(report);
        assert_eq!(e.to_string(), "uncaught failure in panic: index out of bounds");
    }
}

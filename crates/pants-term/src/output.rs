// SPDX-License-Identifier: MIT
//
// Output sink.
//
// Every draw call builds its escape bytes and hands them here in one piece.
// In flush-always mode each of those pieces is flushed immediately, which
// makes partial frames visible but is handy when debugging a demo. Otherwise
// bytes sit in the sink's own buffering until the frame loop flushes once
// per executed tick.

use std::io::{self, Write};

/// The engine's output stream.
pub struct Output {
    sink: Box<dyn Write>,
    flush_always: bool,
}

impl Output {
    /// Wrap any writer.
    #[must_use]
    pub fn new(sink: Box<dyn Write>, flush_always: bool) -> Self {
        Self {
            sink,
            flush_always,
        }
    }

    /// Write one draw call's worth of bytes, flushing in flush-always mode.
    ///
    /// # Errors
    ///
    /// Propagates write and flush errors from the sink.
    pub fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)?;
        if self.flush_always {
            self.sink.flush()?;
        }
        Ok(())
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Propagates the sink's flush error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Whether every emit is flushed.
    #[inline]
    #[must_use]
    pub const fn flush_always(&self) -> bool {
        self.flush_always
    }

    /// Turn flush-always mode on or off.
    #[inline]
    pub const fn set_flush_always(&mut self, on: bool) {
        self.flush_always = on;
    }

    /// Swap in a new sink. The old one is flushed first and handed back.
    ///
    /// # Errors
    ///
    /// Returns the old sink's flush error; the swap does not happen then.
    pub fn replace(&mut self, sink: Box<dyn Write>) -> io::Result<Box<dyn Write>> {
        self.sink.flush()?;
        Ok(std::mem::replace(&mut self.sink, sink))
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("flush_always", &self.flush_always)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Input poller — one character at a time, without blocking by default.
//
// `poll(2)` on the input descriptor decides readiness; `read(2)` then pulls
// exactly one UTF-8 character. A zero wait returns immediately. The engine
// only ever blocks in here: in a positive wait, or in `pause` between
// frames. The caller always picks how long.
//
// There is no reader thread and no escape-sequence parsing: an arrow key
// arrives as three separate characters (ESC, '[', 'A') over three polls.

use std::time::Duration;

use crate::terminal::{Fd, STDIN};

/// How long to wait for the rest of a multi-byte character once its lead
/// byte has arrived. Terminals send the whole sequence in one write, so this
/// only matters for truncated input.
const CONTINUATION_WAIT: Duration = Duration::from_millis(10);

/// Single-character reader over a file descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPoller {
    fd: Fd,
}

impl InputPoller {
    /// A poller for `fd`. The descriptor is borrowed, not owned.
    #[inline]
    #[must_use]
    pub const fn new(fd: Fd) -> Self {
        Self { fd }
    }

    /// A poller for standard input.
    #[inline]
    #[must_use]
    pub const fn stdin() -> Self {
        Self::new(STDIN)
    }

    /// The descriptor being polled.
    #[inline]
    #[must_use]
    pub const fn fd(&self) -> Fd {
        self.fd
    }

    /// Read one character if one is available within `wait`.
    ///
    /// `Duration::ZERO` never blocks. Nothing available, end of input, and
    /// a failed poll all return `None`. Invalid UTF-8 comes back as
    /// `U+FFFD`.
    pub fn poll(&self, wait: Duration) -> Option<char> {
        if !self.wait_ready(wait) {
            return None;
        }

        let lead = self.read_byte()?;
        let len = utf8_len(lead);
        if len == 1 {
            return Some(char::from(lead));
        }
        if len == 0 {
            return Some(char::REPLACEMENT_CHARACTER);
        }

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(len).skip(1) {
            if !self.wait_ready(CONTINUATION_WAIT) {
                return Some(char::REPLACEMENT_CHARACTER);
            }
            match self.read_byte() {
                Some(b) => *slot = b,
                None => return Some(char::REPLACEMENT_CHARACTER),
            }
        }

        Some(
            std::str::from_utf8(&bytes[..len])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        )
    }

    /// Wait up to `timeout` for input to become readable, consuming nothing.
    #[cfg(unix)]
    #[must_use]
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms(timeout)) };

        // Timeout (0) or error (-1, including EINTR from SIGWINCH).
        ready > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        std::thread::sleep(timeout);
        false
    }

    /// Suspend for `timeout` regardless of input.
    ///
    /// The frame loop idles here between frames. Waiting on readiness
    /// instead would spin as soon as a key sits unread.
    #[cfg(unix)]
    pub fn pause(&self, timeout: Duration) {
        if timeout.is_zero() {
            return;
        }
        // No descriptors: a plain timed wait. EINTR just ends it early.
        unsafe {
            libc::poll(std::ptr::null_mut(), 0, timeout_ms(timeout));
        }
    }

    #[cfg(not(unix))]
    pub fn pause(&self, timeout: Duration) {
        std::thread::sleep(timeout);
    }

    /// Whether no further input can ever arrive: the other end hung up, the
    /// descriptor is in error, or it is not open at all.
    #[cfg(unix)]
    #[must_use]
    pub fn hung_up(&self) -> bool {
        // poll(2) silently skips negative descriptors.
        if self.fd < 0 {
            return true;
        }
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, 0) };
        ready > 0 && pfd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn hung_up(&self) -> bool {
        true
    }

    #[cfg(unix)]
    fn read_byte(&self) -> Option<u8> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&raw mut byte).cast(), 1) };
        // 0 is end of input, negative is an error.
        (n == 1).then_some(byte)
    }

    #[cfg(not(unix))]
    fn read_byte(&self) -> Option<u8> {
        None
    }
}

impl Default for InputPoller {
    fn default() -> Self {
        Self::stdin()
    }
}

/// Convert a wait into poll's millisecond timeout.
///
/// Sub-millisecond waits round up so a positive wait never turns into a
/// non-blocking poll.
#[cfg(unix)]
fn timeout_ms(wait: Duration) -> libc::c_int {
    if wait.is_zero() {
        return 0;
    }
    let ms = wait.as_nanos().div_ceil(1_000_000);
    libc::c_int::try_from(ms).unwrap_or(libc::c_int::MAX)
}

/// Encoded length implied by a UTF-8 lead byte; 0 for a byte that cannot
/// start a character.
const fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

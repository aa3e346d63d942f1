// SPDX-License-Identifier: MIT
//
// Frame scheduler — skip-if-early throttling and the frame clock.
//
// The scheduler never sleeps. The driver loop calls `tick` as often as it
// likes; a tick that arrives before a full frame period has passed since the
// last executed frame is a no-op. A tick that arrives late executes and
// resets the reference point to *now*, so there is no catch-up burst after a
// stall.
//
// To avoid spinning between frames the driver asks `until_next` how long it
// may block, and spends that time waiting on input readiness instead.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Frame counter plus the timing of the last executed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    /// Executed frames since the scheduler was created.
    pub frames: u64,
    /// When the last executed frame started (creation time before any).
    pub last_frame: Instant,
    /// Time between the last two executed frames.
    pub delta: Duration,
}

/// Fixed-rate frame throttle.
#[derive(Debug, Clone)]
pub struct Scheduler {
    fps: u32,
    period: Duration,
    clock: FrameClock,
}

impl Scheduler {
    /// A scheduler targeting `fps`, with `now` as the reference point.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] for `fps == 0`.
    pub fn new(fps: u32, now: Instant) -> Result<Self> {
        Ok(Self {
            fps,
            period: period_for(fps)?,
            clock: FrameClock {
                frames: 0,
                last_frame: now,
                delta: Duration::ZERO,
            },
        })
    }

    /// Target frames per second.
    #[inline]
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Change the target rate. Applies from the next comparison on; time
    /// already elapsed is not reinterpreted.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] for `fps == 0`; the old rate stays.
    pub fn set_fps(&mut self, fps: u32) -> Result<()> {
        self.period = period_for(fps)?;
        self.fps = fps;
        Ok(())
    }

    /// Minimum time between executed frames.
    #[inline]
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// The frame clock.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Evaluate the throttle at `now`.
    ///
    /// Returns the measured delta when the frame executes, `None` when it is
    /// skipped. Skipped ticks leave the clock untouched.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let delta = now.saturating_duration_since(self.clock.last_frame);
        if delta < self.period {
            return None;
        }
        self.clock.last_frame = now;
        self.clock.frames += 1;
        self.clock.delta = delta;
        Some(delta)
    }

    /// How long until the next frame is due; zero if it already is.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.clock.last_frame);
        self.period.saturating_sub(elapsed)
    }
}

fn period_for(fps: u32) -> Result<Duration> {
    if fps == 0 {
        return Err(Error::InvalidFrameRate(fps));
    }
    Ok(Duration::from_secs(1) / fps)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Session — scoped terminal lifecycle around the frame loop.
//
//   Uninitialized ──enter──▶ Active ──hook fails──▶ ErrorOverlay
//                              │                        │
//                              └──────teardown──────────┴──▶ Terminated
//
// `enter` refuses anything that is not a terminal, saves the attribute set,
// switches to cbreak or raw, hides the cursor and clears the screen.
// `teardown` runs the `kill` hook, then restores attributes, shows the
// cursor, resets style, clears and homes. It runs at most once: calling it
// again, or before `enter`, does nothing.
//
// Teardown is reached on every exit path. `run` calls it explicitly so its
// errors can be returned; the guard's `Drop` calls it for early returns and
// unwinding. A panic inside a hook never unwinds this far: it is caught and
// shown on the error overlay like any returned error. SIGINT and SIGTERM are
// held off for the lifetime of the session and end it like a quit.
//
// A session runs once. The engine can be handed to a fresh session
// afterwards; entering clears any quit left over from the last one.

use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::{Engine, Hooks};
use crate::error::{Error, Result};
use crate::overlay::{self, FailureReport};
use crate::signals;
use crate::terminal::{self, capture_panics, install_panic_hook};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, terminal untouched.
    #[default]
    Uninitialized,
    /// Terminal mode switched, frames running.
    Active,
    /// A hook failed; the overlay is up.
    ErrorOverlay,
    /// Torn down. Terminal restored.
    Terminated,
}

/// A terminal session over an engine and a set of hooks.
pub struct Session<'a, H: Hooks + ?Sized> {
    engine: &'a mut Engine,
    hooks: &'a mut H,
    state: SessionState,
}

impl<'a, H: Hooks + ?Sized> Session<'a, H> {
    /// A session that has not touched the terminal yet.
    pub fn new(engine: &'a mut Engine, hooks: &'a mut H) -> Self {
        Self {
            engine,
            hooks,
            state: SessionState::Uninitialized,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Take over the terminal. Does nothing if already entered.
    ///
    /// # Errors
    ///
    /// [`Error::TerminalNotInteractive`] if input is not a terminal (the
    /// terminal is left untouched), or OS errors from the mode switch.
    pub fn enter(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Ok(());
        }
        if !self.engine.tty().is_tty() {
            return Err(Error::TerminalNotInteractive);
        }

        install_panic_hook();
        let mode = self.engine.config().input_mode();
        self.engine.tty_mut().enter_mode(mode)?;
        // From here on teardown has something to undo.
        self.state = SessionState::Active;
        signals::arm()?;
        self.engine.resume();
        debug!(?mode, "terminal session entered");

        self.engine.emit_with(|w| terminal::write_setup(w))?;
        self.engine.flush()
    }

    /// Enter, run `start` and the frame loop until quit, then tear down.
    ///
    /// A failing hook shows the error overlay and still counts as a normal
    /// end of session. A session that was already torn down does nothing.
    ///
    /// # Errors
    ///
    /// Entry errors, output errors, and teardown errors.
    /// [`Error::Interrupted`] if SIGINT or SIGTERM ended the session.
    pub fn run(&mut self) -> Result<()> {
        if self.state == SessionState::Terminated {
            debug!("session already ran, not running again");
            return Ok(());
        }
        self.enter()?;
        let outcome = self.drive();
        let closed = self.teardown();
        outcome.and(closed)?;
        signals::pending().map_or(Ok(()), |signal| Err(Error::Interrupted(signal)))
    }

    /// Restore the terminal. Runs once; later calls and calls before
    /// [`enter`](Self::enter) are no-ops.
    ///
    /// Every step is attempted even if an earlier one fails; the first
    /// failure is returned.
    ///
    /// # Errors
    ///
    /// Attribute restore or output errors.
    pub fn teardown(&mut self) -> Result<()> {
        match self.state {
            SessionState::Uninitialized | SessionState::Terminated => return Ok(()),
            SessionState::Active | SessionState::ErrorOverlay => {}
        }
        self.state = SessionState::Terminated;

        let hooks = &mut *self.hooks;
        if let Err(panic) = capture_panics(|| hooks.kill()) {
            warn!(message = %panic.message, "kill hook panicked");
        }

        let restored = self.engine.tty_mut().restore_mode();
        if let Err(e) = &restored {
            warn!(error = %e, "failed to restore terminal attributes");
        }

        let screen = self
            .engine
            .emit_with(|w| terminal::write_restore(w))
            .and_then(|()| self.engine.flush());
        if let Err(e) = &screen {
            warn!(error = %e, "failed to reset the screen");
        }

        signals::disarm();
        debug!(frames = self.engine.clock(), "terminal session torn down");
        restored?;
        screen
    }

    fn drive(&mut self) -> Result<()> {
        let outcome = self
            .guarded(|engine, hooks| engine.start(hooks))
            .and_then(|()| self.frame_loop());

        match outcome {
            Err(Error::UncaughtCallbackFailure(report)) => {
                warn!(%report, "hook failed, showing error overlay");
                self.state = SessionState::ErrorOverlay;
                overlay::run(self.engine, &report)
            }
            other => other,
        }
    }

    fn frame_loop(&mut self) -> Result<()> {
        while !self.stopping() {
            self.guarded(|engine, hooks| engine.tick(hooks, Instant::now()))?;
            if self.stopping() {
                break;
            }
            let idle = self.engine.until_next_frame(Instant::now());
            self.engine.input().pause(idle);
        }
        Ok(())
    }

    /// Whether the loop should end: quit was requested, or a termination
    /// signal arrived (which requests quit).
    fn stopping(&mut self) -> bool {
        if !self.engine.quit_requested() {
            if let Some(signal) = signals::pending() {
                debug!(signal, "termination signal received, quitting");
                self.engine.quit();
            }
        }
        self.engine.quit_requested()
    }

    /// Call into hook code with panics turned into callback failures.
    fn guarded<T>(&mut self, f: impl FnOnce(&mut Engine, &mut H) -> Result<T>) -> Result<T> {
        let engine = &mut *self.engine;
        let hooks = &mut *self.hooks;
        capture_panics(|| f(engine, hooks)).unwrap_or_else(|panic| {
            Err(Error::UncaughtCallbackFailure(FailureReport::from_panic(
                &panic,
            )))
        })
    }
}

impl<H: Hooks + ?Sized> Drop for Session<'_, H> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!(error = %e, "teardown on drop failed");
        }
    }
}

/// Run `hooks` in a session on stdin/stdout.
///
/// # Errors
///
/// [`Error::InvalidFrameRate`], [`Error::TerminalNotInteractive`], and I/O
/// errors. Hook failures are shown on the overlay and are not errors here.
pub fn run<H: Hooks + ?Sized>(config: Config, hooks: &mut H) -> Result<()> {
    let mut engine = Engine::new(config)?;
    run_with(&mut engine, hooks)
}

/// Run `hooks` in a session on an existing engine.
///
/// # Errors
///
/// As [`run`].
pub fn run_with<H: Hooks + ?Sized>(engine: &mut Engine, hooks: &mut H) -> Result<()> {
    Session::new(engine, hooks).run()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

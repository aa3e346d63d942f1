// SPDX-License-Identifier: MIT
//
// Termination signals — SIGINT and SIGTERM end a session through its normal
// teardown instead of killing the process mid-frame.
//
// Handlers are installed once per process, on the first session entry, and
// stay installed. Each signal gets two actions, run in order:
//
//   1. If no session is armed, perform the signal's default action. The
//      process terminates exactly as it would have without the handlers.
//   2. Otherwise record the signal number.
//
// The frame loop and the error overlay check the recorded signal between
// frames and stop; the session then tears down as if quit had been
// requested. Cbreak mode keeps ISIG on, so Ctrl-C arrives here; raw mode
// turns it off and only SIGTERM from outside can.
//
// One terminal means one armed session at a time. The state is global.

use std::io;

/// Route SIGINT and SIGTERM to the session from now on. Clears any signal
/// recorded by an earlier session.
///
/// # Errors
///
/// OS errors from installing the handlers.
pub fn arm() -> io::Result<()> {
    imp::arm()
}

/// Give SIGINT and SIGTERM back their default action.
pub fn disarm() {
    imp::disarm();
}

/// The termination signal received since [`arm`], if any.
#[must_use]
pub fn pending() -> Option<i32> {
    imp::pending()
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, LazyLock, Mutex, PoisonError};

    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::flag;

    /// True while no session is armed.
    static IDLE: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| Arc::new(AtomicBool::new(true)));

    /// The last signal number received while armed, 0 for none.
    static PENDING: LazyLock<Arc<AtomicUsize>> = LazyLock::new(|| Arc::new(AtomicUsize::new(0)));

    static INSTALLED: Mutex<bool> = Mutex::new(false);

    fn install() -> io::Result<()> {
        let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
        if *installed {
            return Ok(());
        }
        for signal in [SIGINT, SIGTERM] {
            let number = usize::try_from(signal).map_err(io::Error::other)?;
            flag::register_conditional_default(signal, Arc::clone(&IDLE))?;
            flag::register_usize(signal, Arc::clone(&PENDING), number)?;
        }
        *installed = true;
        Ok(())
    }

    pub fn arm() -> io::Result<()> {
        install()?;
        PENDING.store(0, Ordering::SeqCst);
        IDLE.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn disarm() {
        IDLE.store(true, Ordering::SeqCst);
    }

    pub fn pending() -> Option<i32> {
        match PENDING.load(Ordering::SeqCst) {
            0 => None,
            n => i32::try_from(n).ok(),
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    pub const fn arm() -> io::Result<()> {
        Ok(())
    }

    pub const fn disarm() {}

    pub const fn pending() -> Option<i32> {
        None
    }
}

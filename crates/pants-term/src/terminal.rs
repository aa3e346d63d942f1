// SPDX-License-Identifier: MIT
//
// Terminal control — termios modes, size queries, and panic-safe restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and isatty. These are the standard POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The session talks to the terminal through the `Tty` trait so the whole
// lifecycle can run against a recording fake in tests. `Termios` is the real
// implementation.
//
// Panics get two treatments:
//
//   - Inside a hook, the session wants the panic as data for the overlay.
//     `capture_panics` flags the current thread; the hook records message
//     and location and stays silent.
//
//   - Anywhere else the panic is escaping. If a session still holds the
//     terminal, the hook restores the saved termios from a global backup and
//     writes a restore sequence straight to fd 1 before the default handler
//     prints, so the message lands on a working terminal. With no session
//     active the screen is left alone.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;
use crate::viewport::Viewport;

/// A raw file descriptor.
pub type Fd = std::ffi::c_int;

/// Standard input's descriptor.
pub const STDIN: Fd = 0;

/// Standard output's descriptor.
pub const STDOUT: Fd = 1;

// ─── Input Mode ─────────────────────────────────────────────────────────────

/// How keystrokes are delivered once the session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// No line buffering, no echo; Ctrl-C and friends still raise signals.
    #[default]
    Cbreak,
    /// Everything off: no echo, no signals, no output processing.
    Raw,
}

// ─── Tty ────────────────────────────────────────────────────────────────────

/// The terminal operations a session needs.
pub trait Tty {
    /// Whether the input stream is a terminal device.
    fn is_tty(&self) -> bool;

    /// The terminal's size, or `None` if it cannot be queried.
    fn size(&self) -> Option<Viewport>;

    /// Save the current attribute set and switch to `mode`.
    ///
    /// # Errors
    ///
    /// OS errors from reading or applying attributes.
    fn enter_mode(&mut self, mode: InputMode) -> io::Result<()>;

    /// Put the saved attribute set back. No-op if nothing was saved.
    ///
    /// # Errors
    ///
    /// OS errors from applying attributes.
    fn restore_mode(&mut self) -> io::Result<()>;
}

// ─── Termios ────────────────────────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// The [`Termios`] value owns its own copy, but the panic hook can't reach
/// it. This backup, behind a [`Mutex`], lets the hook restore the mode
/// without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(Fd, libc::termios)>> = Mutex::new(None);

/// The real terminal, driven through termios on a file descriptor.
pub struct Termios {
    fd: Fd,
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl Termios {
    /// A backend for `fd`. Nothing changes until [`Tty::enter_mode`].
    #[must_use]
    pub const fn new(fd: Fd) -> Self {
        Self {
            fd,
            #[cfg(unix)]
            original: None,
        }
    }

    /// A backend for standard input.
    #[must_use]
    pub const fn stdin() -> Self {
        Self::new(STDIN)
    }

    /// The descriptor this backend controls.
    #[inline]
    #[must_use]
    pub const fn fd(&self) -> Fd {
        self.fd
    }
}

#[cfg(unix)]
impl Tty for Termios {
    fn is_tty(&self) -> bool {
        unsafe { libc::isatty(self.fd) != 0 }
    }

    fn size(&self) -> Option<Viewport> {
        query_size(self.fd).or_else(|| query_size(STDOUT))
    }

    fn enter_mode(&mut self, mode: InputMode) -> io::Result<()> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(self.fd, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }

        // Keep the first snapshot if entered twice; that's the one to restore.
        if self.original.is_none() {
            self.original = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some((self.fd, termios));
            }
        }

        match mode {
            InputMode::Raw => make_raw(&mut termios),
            InputMode::Cbreak => make_cbreak(&mut termios),
        }

        if unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original else {
            return Ok(());
        };

        if unsafe { libc::tcsetattr(self.fd, libc::TCSADRAIN, &raw const original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        // Restored successfully, the panic hook has nothing left to do.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        self.original = None;
        Ok(())
    }
}

#[cfg(not(unix))]
impl Tty for Termios {
    fn is_tty(&self) -> bool {
        false
    }

    fn size(&self) -> Option<Viewport> {
        None
    }

    fn enter_mode(&mut self, _mode: InputMode) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "termios is only available on unix",
        ))
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Query a descriptor's window size via `ioctl(TIOCGWINSZ)`.
#[cfg(unix)]
fn query_size(fd: Fd) -> Option<Viewport> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Viewport::new(ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

/// cfmakeraw equivalent: disable all line processing.
#[cfg(unix)]
fn make_raw(t: &mut libc::termios) {
    t.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON);
    t.c_oflag &= !libc::OPOST;
    t.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    t.c_cflag &= !(libc::CSIZE | libc::PARENB);
    t.c_cflag |= libc::CS8;
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
}

/// Character-at-a-time input without echo. Signals and output
/// post-processing stay on.
#[cfg(unix)]
fn make_cbreak(t: &mut libc::termios) {
    t.c_lflag &= !(libc::ECHO | libc::ICANON);
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
}

/// Restore termios from the global backup and clear it. Best-effort,
/// ignores errors. Returns whether a session was holding the terminal.
#[cfg(unix)]
fn restore_termios_from_backup() -> bool {
    let Ok(mut guard) = TERMIOS_BACKUP.lock() else {
        return false;
    };
    let Some((fd, original)) = guard.take() else {
        return false;
    };
    unsafe {
        let _ = libc::tcsetattr(fd, libc::TCSANOW, &raw const original);
    }
    true
}

#[cfg(not(unix))]
const fn restore_termios_from_backup() -> bool {
    false
}

// ─── Panic Handling ─────────────────────────────────────────────────────────

/// Restore sequence written when a panic escapes the session: reset SGR,
/// show the cursor, clear, home.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[0m\
    \x1b[?25h\
    \x1b[2J\
    \x1b[f";

/// A panic caught while running a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtPanic {
    /// The panic payload, if it was a string.
    pub message: String,
    /// `file:line:column` of the panic site, when known.
    pub location: Option<String>,
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<CaughtPanic>> = const { RefCell::new(None) };
}

/// Panic hook guard, ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install the panic hook described in the module header.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let caught = CaughtPanic {
                    message: payload_message(info.payload()),
                    location: info
                        .location()
                        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
                };
                CAPTURED.with(|c| *c.borrow_mut() = Some(caught));
                return;
            }

            if restore_termios_from_backup() {
                emergency_restore();
            }
            original(info);
        }));
    });
}

/// Run `f`, turning a panic into a [`CaughtPanic`] instead of unwinding
/// further. The panic hook stays quiet for panics caught here.
///
/// # Errors
///
/// The caught panic, if `f` panicked.
pub fn capture_panics<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    install_panic_hook();

    let was = CAPTURING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|c| c.set(was));

    result.map_err(|payload| {
        CAPTURED
            .with(|c| c.borrow_mut().take())
            .unwrap_or_else(|| CaughtPanic {
                message: payload_message(payload.as_ref()),
                location: None,
            })
    })
}

fn payload_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}

/// Write the restore sequence directly to stdout's file descriptor.
///
/// Bypasses Rust's `io::stdout()` lock in case the panic happened while
/// the lock was held.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            STDOUT,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

/// Write the sequences that undo `enter`'s screen effects: show the cursor,
/// reset style, clear, home.
///
/// # Errors
///
/// Propagates writer errors.
pub fn write_restore(w: &mut impl Write) -> io::Result<()> {
    ansi::cursor_show(w)?;
    ansi::reset(w)?;
    ansi::clear_screen(w)?;
    ansi::home(w)
}

/// Write the sequences `enter` uses: hide the cursor, clear, home.
///
/// # Errors
///
/// Propagates writer errors.
pub fn write_setup(w: &mut impl Write) -> io::Result<()> {
    ansi::cursor_hide(w)?;
    ansi::clear_screen(w)?;
    ansi::home(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Mode flags ──────────────────────────────────────────────────

    #[cfg(unix)]
    fn all_flags_set() -> libc::termios {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = !0;
        t.c_oflag = !0;
        t.c_lflag = !0;
        t.c_cflag = !0;
        t.c_cc[libc::VMIN] = 9;
        t.c_cc[libc::VTIME] = 9;
        t
    }

    #[cfg(unix)]
    #[test]
    fn raw_disables_signals_and_output_processing() {
        let mut t = all_flags_set();
        make_raw(&mut t);
        assert_eq!(t.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG), 0);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
        assert_eq!(t.c_iflag & (libc::ICRNL | libc::IXON), 0);
        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(t.c_cc[libc::VMIN], 1);
        assert_eq!(t.c_cc[libc::VTIME], 0);
    }

    #[cfg(unix)]
    #[test]
    fn cbreak_keeps_signals_and_output_processing() {
        let mut t = all_flags_set();
        make_cbreak(&mut t);
        assert_eq!(t.c_lflag & (libc::ECHO | libc::ICANON), 0);
        assert_ne!(t.c_lflag & libc::ISIG, 0);
        assert_ne!(t.c_oflag & libc::OPOST, 0);
        assert_eq!(t.c_cc[libc::VMIN], 1);
        assert_eq!(t.c_cc[libc::VTIME], 0);
    }

    #[test]
    fn default_mode_is_cbreak() {
        assert_eq!(InputMode::default(), InputMode::Cbreak);
    }

    // ── Termios backend ─────────────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn socket_is_not_a_tty() {
        use std::os::unix::io::AsRawFd;
        use std::os::unix::net::UnixStream;

        let (a, _b) = UnixStream::pair().unwrap();
        let tty = Termios::new(a.as_raw_fd());
        assert!(!tty.is_tty());
    }

    #[cfg(unix)]
    #[test]
    fn enter_mode_on_socket_fails() {
        use std::os::unix::io::AsRawFd;
        use std::os::unix::net::UnixStream;

        let (a, _b) = UnixStream::pair().unwrap();
        let mut tty = Termios::new(a.as_raw_fd());
        assert!(tty.enter_mode(InputMode::Raw).is_err());
        // Nothing was saved, so restoring is a no-op.
        tty.restore_mode().unwrap();
    }

    #[test]
    fn restore_without_enter_is_noop() {
        let mut tty = Termios::stdin();
        tty.restore_mode().unwrap();
        tty.restore_mode().unwrap();
        assert_eq!(tty.fd(), STDIN);
    }

    #[test]
    fn size_does_not_panic() {
        let _ = Termios::stdin().size();
    }

    // ── Sequences ───────────────────────────────────────────────────

    #[test]
    fn setup_and_restore_sequences() {
        assert_eq!(ansi::render(|w| write_setup(w)), "\x1b[?25l\x1b[2J\x1b[f");
        assert_eq!(ansi::render(|w| write_restore(w)), "\x1b[?25h\x1b[0m\x1b[2J\x1b[f");
    }

    #[cfg(unix)]
    #[test]
    fn backup_restore_only_fires_while_a_session_holds_the_terminal() {
        // No test here enters a real terminal, so the backup starts empty.
        assert!(!restore_termios_from_backup());

        let saved: libc::termios = unsafe { std::mem::zeroed() };
        *TERMIOS_BACKUP.lock().unwrap() = Some((-1, saved));
        assert!(restore_termios_from_backup());
        // Taken on use: a second escaping panic leaves the screen alone.
        assert!(!restore_termios_from_backup());
        assert!(TERMIOS_BACKUP.lock().unwrap().is_none());
    }

    #[test]
    fn emergency_restore_shows_cursor_and_resets() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[0m"), "must reset SGR attributes");
        assert!(s.contains("\x1b[?25h"), "must show cursor");
        assert!(s.ends_with("\x1b[f"), "must home the cursor last");
    }

    // ── Panic capture ───────────────────────────────────────────────

    #[test]
    fn capture_returns_value_without_panic() {
        assert_eq!(capture_panics(|| 41 + 1), Ok(42));
    }

    #[test]
    fn capture_records_message_and_location() {
        let caught = capture_panics(|| -> u8 { panic!("boom {}", 7) }).unwrap_err();
        assert_eq!(caught.message, "boom 7");
        let location = caught.location.unwrap();
        assert!(location.contains("terminal.rs"), "{location}");
    }

    #[test]
    fn capture_static_str_payload() {
        let caught = capture_panics(|| -> u8 { std::panic::panic_any("plain") }).unwrap_err();
        assert_eq!(caught.message, "plain");
    }

    #[test]
    fn capture_restores_flag() {
        let _ = capture_panics(|| -> u8 { panic!("once") });
        assert!(!CAPTURING.with(Cell::get));
    }
}

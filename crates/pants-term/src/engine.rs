// SPDX-License-Identifier: MIT
//
// Engine — the handle hooks draw through.
//
// Every draw call encodes its escape bytes into a reused scratch buffer and
// hands them to the output sink in one piece. Nothing is retained between
// calls: no frame buffer, no diff. Positions wrap around the viewport, and
// the viewport is re-sampled from the terminal at the start of every tick,
// before `update` runs.
//
// The engine also owns the frame scheduler and the input poller, so a hook
// can read the clock, change the frame rate, and poll keys without any other
// handle.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::ansi;
use crate::bake;
use crate::cell::Cell;
use crate::color::{Color, PlateCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::InputPoller;
use crate::output::Output;
use crate::overlay::FailureReport;
use crate::scheduler::{FrameClock, Scheduler};
use crate::terminal::{Fd, Termios, Tty};
use crate::viewport::Viewport;

// ─── Hooks ───────────────────────────────────────────────────────────────────

/// User code driven by a session.
///
/// All three methods have no-op defaults. State the hooks need lives in the
/// implementing type.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use pants_term::{Color, Config, Engine, Hooks};
///
/// struct Hello;
///
/// impl Hooks for Hello {
///     fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
///         engine.draw_str("hello", 2, 1, Color::WHITE, Color::BLACK)?;
///         if engine.get_char(Duration::ZERO) == Some('q') {
///             engine.quit();
///         }
///         Ok(())
///     }
/// }
///
/// pants_term::run(Config::default(), &mut Hello)?;
/// # Ok::<(), pants_term::Error>(())
/// ```
pub trait Hooks {
    /// Called once after the terminal is set up, before the first tick.
    /// Output written here is flushed before ticking starts.
    ///
    /// # Errors
    ///
    /// Any error ends the session through the error overlay.
    fn start(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once per executed frame with the time since the previous one.
    ///
    /// # Errors
    ///
    /// Any error ends the session through the error overlay.
    fn update(&mut self, _engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called exactly once during teardown, before the terminal is restored.
    ///
    /// No engine is passed: by now the session is closing and the engine's
    /// output is about to be flushed and reset. The terminal is still in
    /// cbreak or raw mode, so a hook that wants to leave something on it
    /// writes to stdout directly (`std::io::stdout().lock()`), flushing
    /// before it returns. Anything written here is then cleared by the
    /// restore sequence, so this is for terminal side effects (mode
    /// queries, bells, title changes) rather than final text.
    fn kill(&mut self) {}
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Drawing, timing and input for one session.
pub struct Engine {
    config: Config,
    output: Output,
    tty: Box<dyn Tty>,
    input: InputPoller,
    viewport: Viewport,
    cursor: (u16, u16),
    scheduler: Scheduler,
    quit: bool,
    plates: PlateCache,
    scratch: Vec<u8>,
}

impl Engine {
    /// An engine on the process's stdin and stdout.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] if the config's fps is zero.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_io(
            config,
            crate::terminal::STDIN,
            Box::new(io::stdout()),
            Box::new(Termios::stdin()),
        )
    }

    /// An engine on arbitrary I/O: any readable descriptor for keys, any
    /// writer for output, any terminal backend.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] if the config's fps is zero.
    pub fn with_io(
        config: Config,
        input_fd: Fd,
        output: Box<dyn Write>,
        tty: Box<dyn Tty>,
    ) -> Result<Self> {
        config.validate()?;
        let viewport = tty.size().unwrap_or_default();
        Ok(Self {
            output: Output::new(output, config.flush_always),
            input: InputPoller::new(input_fd),
            scheduler: Scheduler::new(config.fps, Instant::now())?,
            config,
            tty,
            viewport,
            cursor: (0, 0),
            quit: false,
            plates: PlateCache::new(),
            scratch: Vec::with_capacity(256),
        })
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Draw one character at `(x, y)` after wraparound.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn draw_char(&mut self, ch: char, x: i32, y: i32, fg: Color, bg: Color) -> Result<()> {
        let mut buf = self.take_scratch();
        self.cursor = self.viewport.write_move_to(&mut buf, x, y)?;
        buf.extend_from_slice(self.plates.get(fg, bg).as_bytes());
        push_char(&mut buf, ch);
        self.emit_scratch(buf)
    }

    /// Draw a string starting at `(x, y)` after wraparound, in one color
    /// pair. Characters past the right edge are dropped.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn draw_str(&mut self, s: &str, x: i32, y: i32, fg: Color, bg: Color) -> Result<()> {
        let mut buf = self.take_scratch();
        let (cx, cy) = self.viewport.write_move_to(&mut buf, x, y)?;
        self.cursor = (cx, cy);

        let visible = self.viewport.clip_len(cx, s.chars().count());
        let plate = self.plates.get(fg, bg);
        for ch in s.chars().take(visible) {
            buf.extend_from_slice(plate.as_bytes());
            push_char(&mut buf, ch);
        }
        self.emit_scratch(buf)
    }

    /// Like [`draw_str`](Self::draw_str), with a color pair per character.
    ///
    /// Character `i` uses `fg[i]` and `bg[i]`. Where a list is too short the
    /// default pair (white on black) fills in.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn draw_str_colored(
        &mut self,
        s: &str,
        x: i32,
        y: i32,
        fg: &[Color],
        bg: &[Color],
    ) -> Result<()> {
        let mut buf = self.take_scratch();
        let (cx, cy) = self.viewport.write_move_to(&mut buf, x, y)?;
        self.cursor = (cx, cy);

        let visible = self.viewport.clip_len(cx, s.chars().count());
        for (i, ch) in s.chars().take(visible).enumerate() {
            let f = fg.get(i).copied().unwrap_or(Color::WHITE);
            let b = bg.get(i).copied().unwrap_or(Color::BLACK);
            buf.extend_from_slice(self.plates.get(f, b).as_bytes());
            push_char(&mut buf, ch);
        }
        self.emit_scratch(buf)
    }

    /// Bake `grid` at the given offset, write it, then home the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::IrregularGrid`] for ragged rows (nothing is written then),
    /// otherwise output errors.
    pub fn write_data<R: AsRef<[Cell]>>(
        &mut self,
        grid: &[R],
        offset_x: u16,
        offset_y: u16,
    ) -> Result<()> {
        let mut buf = self.take_scratch();
        let baked = bake::write_grid(&mut buf, grid, offset_x, offset_y)
            .and_then(|()| ansi::home(&mut buf).map_err(Error::from));
        if let Err(e) = baked {
            self.scratch = buf;
            return Err(e);
        }
        self.cursor = (0, 0);
        self.emit_scratch(buf)
    }

    /// Write raw text at the cursor.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn write(&mut self, s: &str) -> Result<()> {
        self.output.emit(s.as_bytes())?;
        Ok(())
    }

    /// Write raw text and flush right away.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn write_flush(&mut self, s: &str) -> Result<()> {
        self.write(s)?;
        self.flush()
    }

    /// Move the cursor to `(x, y)` after wraparound.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        let mut buf = self.take_scratch();
        self.cursor = self.viewport.write_move_to(&mut buf, x, y)?;
        self.emit_scratch(buf)
    }

    /// Home the cursor.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn reset_cursor(&mut self) -> Result<()> {
        self.cursor = (0, 0);
        self.output.emit(ansi::HOME.as_bytes())?;
        Ok(())
    }

    /// Reset colors and every other SGR attribute.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn reset_color(&mut self) -> Result<()> {
        self.output.emit(ansi::RESET.as_bytes())?;
        Ok(())
    }

    /// Clear the whole screen. The cursor does not move.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.output.emit(ansi::CLEAR_SCREEN.as_bytes())?;
        Ok(())
    }

    /// Set the color pair for whatever is written next.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn set_color(&mut self, fg: Color, bg: Color) -> Result<()> {
        let plate = self.plates.get(fg, bg);
        self.output.emit(plate.as_bytes())?;
        Ok(())
    }

    /// `s` prefixed with the color pair, for building lines by hand.
    #[must_use]
    pub fn colorized(&mut self, s: &str, fg: Color, bg: Color) -> String {
        let plate = self.plates.get(fg, bg);
        let mut out = String::with_capacity(plate.len() + s.len());
        out.push_str(plate);
        out.push_str(s);
        out
    }

    /// Flush the output.
    ///
    /// # Errors
    ///
    /// Output errors.
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// One character of input, waiting at most `wait` for it.
    #[must_use]
    pub fn get_char(&self, wait: Duration) -> Option<char> {
        self.input.poll(wait)
    }

    /// The input poller.
    #[inline]
    #[must_use]
    pub const fn input(&self) -> &InputPoller {
        &self.input
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Ask the session to stop. Takes effect before the next tick.
    #[inline]
    pub const fn quit(&mut self) {
        self.quit = true;
    }

    /// Forget an earlier [`quit`](Self::quit) so the engine can drive
    /// another session.
    #[inline]
    pub(crate) const fn resume(&mut self) {
        self.quit = false;
    }

    /// Whether [`quit`](Self::quit) was called.
    #[inline]
    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Run one iteration of the frame loop at `now`.
    ///
    /// Re-samples the viewport, then lets the scheduler decide. On an
    /// executed frame `update` runs with the measured delta and the output is
    /// flushed. Returns whether the frame executed.
    ///
    /// # Errors
    ///
    /// [`Error::UncaughtCallbackFailure`] when `update` fails, otherwise
    /// output errors.
    pub fn tick<H: Hooks + ?Sized>(&mut self, hooks: &mut H, now: Instant) -> Result<bool> {
        self.refresh_viewport();

        let Some(delta) = self.scheduler.tick(now) else {
            return Ok(false);
        };
        hooks
            .update(self, delta)
            .map_err(|e| Error::UncaughtCallbackFailure(FailureReport::from_error(&e)))?;
        self.output.flush()?;
        Ok(true)
    }

    /// Run the `start` hook and flush whatever it wrote.
    ///
    /// # Errors
    ///
    /// [`Error::UncaughtCallbackFailure`] when `start` fails, otherwise
    /// output errors.
    pub fn start<H: Hooks + ?Sized>(&mut self, hooks: &mut H) -> Result<()> {
        hooks
            .start(self)
            .map_err(|e| Error::UncaughtCallbackFailure(FailureReport::from_error(&e)))?;
        self.flush()
    }

    /// How long the frame loop may idle before the next frame is due.
    #[must_use]
    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.scheduler.until_next(now)
    }

    // ── Dimensions ───────────────────────────────────────────────────

    /// The viewport as of the start of the current tick.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.viewport.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.viewport.height
    }

    /// Where the last positioned draw left off, after wraparound.
    #[inline]
    #[must_use]
    pub const fn cursor_position(&self) -> (u16, u16) {
        self.cursor
    }

    /// Query the terminal size again. Unknown sizes fall back to 80×24.
    pub fn refresh_viewport(&mut self) {
        self.viewport = self.tty.size().unwrap_or_default();
    }

    // ── Timing ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.scheduler.fps()
    }

    /// Change the target frame rate, effective from the next tick.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrameRate`] for zero; the old rate stays.
    pub fn set_fps(&mut self, fps: u32) -> Result<()> {
        self.scheduler.set_fps(fps)?;
        debug!(fps, "frame rate changed");
        Ok(())
    }

    /// Frames executed so far.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.scheduler.clock().frames
    }

    /// Time between the last two executed frames.
    #[inline]
    #[must_use]
    pub const fn delta(&self) -> Duration {
        self.scheduler.clock().delta
    }

    /// The full frame clock.
    #[inline]
    #[must_use]
    pub const fn frame_clock(&self) -> &FrameClock {
        self.scheduler.clock()
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Whether every draw call is flushed immediately.
    #[inline]
    #[must_use]
    pub const fn flush_mode(&self) -> bool {
        self.output.flush_always()
    }

    #[inline]
    pub const fn set_flush_mode(&mut self, on: bool) {
        self.output.set_flush_always(on);
    }

    /// Redirect output. The previous writer is flushed and returned.
    ///
    /// # Errors
    ///
    /// The previous writer's flush error; output is not redirected then.
    pub fn set_output(&mut self, sink: Box<dyn Write>) -> Result<Box<dyn Write>> {
        Ok(self.output.replace(sink)?)
    }

    // ── Session plumbing ─────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn tty(&self) -> &dyn Tty {
        self.tty.as_ref()
    }

    pub(crate) fn tty_mut(&mut self) -> &mut dyn Tty {
        self.tty.as_mut()
    }

    /// Encode with `f` into the scratch buffer and emit the result.
    pub(crate) fn emit_with<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = self.take_scratch();
        f(&mut buf)?;
        self.emit_scratch(buf)
    }

    fn take_scratch(&mut self) -> Vec<u8> {
        let mut buf = std::mem::take(&mut self.scratch);
        buf.clear();
        buf
    }

    fn emit_scratch(&mut self, buf: Vec<u8>) -> Result<()> {
        let result = self.output.emit(&buf);
        self.scratch = buf;
        Ok(result?)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("output", &self.output)
            .field("viewport", &self.viewport)
            .field("cursor", &self.cursor)
            .field("scheduler", &self.scheduler)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

fn push_char(buf: &mut Vec<u8>, ch: char) {
    buf.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes());
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;
    use crate::testing::{FakeTty, SharedBuf, new_log};
    use pretty_assertions::assert_eq;

    const PLATE: &str = "\x1b[0m\x1b[37m\x1b[40m";

    /// Engine on a 40×10 fake terminal with no input.
    fn engine() -> (Engine, SharedBuf, FakeTty) {
        engine_with(Config::default())
    }

    fn engine_with(config: Config) -> (Engine, SharedBuf, FakeTty) {
        let buf = SharedBuf::default();
        let tty = FakeTty::new(&new_log());
        let engine =
            Engine::with_io(config, -1, Box::new(buf.clone()), Box::new(tty.clone())).unwrap();
        (engine, buf, tty)
    }

    fn white() -> Color {
        Color::WHITE
    }

    fn black() -> Color {
        Color::BLACK
    }

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<Duration>,
        widths: Vec<u16>,
        fail: bool,
    }

    impl Hooks for Recorder {
        fn update(&mut self, engine: &mut Engine, delta: Duration) -> anyhow::Result<()> {
            self.deltas.push(delta);
            self.widths.push(engine.width());
            if self.fail {
                anyhow::bail!("update failed");
            }
            engine.write("frame")?;
            Ok(())
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn zero_fps_rejected() {
        let buf = SharedBuf::default();
        let tty = FakeTty::new(&new_log());
        let result = Engine::with_io(
            Config::default().with_fps(0),
            -1,
            Box::new(buf),
            Box::new(tty),
        );
        assert!(matches!(result, Err(Error::InvalidFrameRate(0))));
    }

    #[test]
    fn viewport_from_backend() {
        let (e, _, _) = engine();
        assert_eq!(e.dimensions(), Viewport::new(40, 10));
        assert_eq!((e.width(), e.height()), (40, 10));
    }

    #[test]
    fn unknown_size_falls_back() {
        let (mut e, _, tty) = engine();
        tty.resize(None);
        e.refresh_viewport();
        assert_eq!(e.dimensions(), Viewport::FALLBACK);
    }

    // ── Drawing ──────────────────────────────────────────────────────

    #[test]
    fn draw_char_positions_and_colors() {
        let (mut e, buf, _) = engine();
        e.draw_char('@', 3, 2, NamedColor::Green.into(), black()).unwrap();
        assert_eq!(buf.text(), "\x1b[3;4H\x1b[0m\x1b[32m\x1b[40m@");
        assert_eq!(e.cursor_position(), (3, 2));
    }

    #[test]
    fn draw_char_wraps_negative_positions() {
        let (mut e, buf, _) = engine();
        e.draw_char('x', -1, -1, white(), black()).unwrap();
        assert_eq!(buf.text(), format!("\x1b[10;40H{PLATE}x"));
        assert_eq!(e.cursor_position(), (39, 9));
    }

    #[test]
    fn draw_str_clips_at_right_edge() {
        let (mut e, buf, _) = engine();
        e.draw_str("HELLO", 38, 0, white(), black()).unwrap();
        assert_eq!(buf.text(), format!("\x1b[1;39H{PLATE}H{PLATE}E"));
    }

    #[test]
    fn draw_str_fully_visible() {
        let (mut e, buf, _) = engine();
        e.draw_str("hi", 0, 0, white(), black()).unwrap();
        assert_eq!(buf.text(), format!("\x1b[1;1H{PLATE}h{PLATE}i"));
    }

    #[test]
    fn draw_str_counts_chars_not_bytes() {
        let (mut e, buf, _) = engine();
        e.draw_str("ééé", 38, 0, white(), black()).unwrap();
        assert_eq!(buf.text(), format!("\x1b[1;39H{PLATE}é{PLATE}é"));
    }

    #[test]
    fn draw_str_colored_falls_back_per_char() {
        let (mut e, buf, _) = engine();
        let red = Color::from(NamedColor::Red);
        e.draw_str_colored("ab", 0, 0, &[red], &[]).unwrap();
        assert_eq!(
            buf.text(),
            format!("\x1b[1;1H\x1b[0m\x1b[31m\x1b[40ma{PLATE}b")
        );
    }

    #[test]
    fn write_data_bakes_and_homes() {
        let (mut e, buf, _) = engine();
        e.move_cursor(5, 5).unwrap();
        buf.clear();
        e.write_data(&[[Cell::new('z')]], 0, 0).unwrap();
        assert_eq!(buf.text(), format!("\x1b[1;1H{PLATE}z\x1b[0m\r\n\x1b[f"));
        assert_eq!(e.cursor_position(), (0, 0));
    }

    #[test]
    fn write_data_rejects_ragged_grid() {
        let (mut e, buf, _) = engine();
        let grid = vec![vec![Cell::new('a')], vec![]];
        assert!(matches!(
            e.write_data(&grid, 0, 0),
            Err(Error::IrregularGrid { .. })
        ));
        assert!(buf.contents().is_empty());
    }

    #[test]
    fn simple_sequences() {
        let (mut e, buf, _) = engine();
        e.reset_cursor().unwrap();
        e.reset_color().unwrap();
        e.clear_screen().unwrap();
        e.set_color(white(), black()).unwrap();
        e.write("!").unwrap();
        assert_eq!(buf.text(), format!("\x1b[f\x1b[0m\x1b[2J{PLATE}!"));
    }

    #[test]
    fn colorized_prefixes_plate() {
        let (mut e, buf, _) = engine();
        assert_eq!(e.colorized("ok", white(), black()), format!("{PLATE}ok"));
        assert!(buf.contents().is_empty());
    }

    // ── Flushing ─────────────────────────────────────────────────────

    #[test]
    fn buffered_by_default() {
        let (mut e, buf, _) = engine();
        e.draw_char('a', 0, 0, white(), black()).unwrap();
        assert_eq!(buf.flushes(), 0);
        e.write_flush("b").unwrap();
        assert_eq!(buf.flushes(), 1);
    }

    #[test]
    fn flush_mode_flushes_every_draw() {
        let (mut e, buf, _) = engine_with(Config::default().with_flush_always(true));
        assert!(e.flush_mode());
        e.draw_char('a', 0, 0, white(), black()).unwrap();
        e.move_cursor(1, 1).unwrap();
        assert_eq!(buf.flushes(), 2);
        e.set_flush_mode(false);
        e.write("c").unwrap();
        assert_eq!(buf.flushes(), 2);
    }

    #[test]
    fn set_output_flushes_previous() {
        let (mut e, old, _) = engine();
        let new = SharedBuf::default();
        e.write("a").unwrap();
        e.set_output(Box::new(new.clone())).unwrap();
        e.write("b").unwrap();
        assert_eq!(old.text(), "a");
        assert_eq!(old.flushes(), 1);
        assert_eq!(new.text(), "b");
    }

    // ── Ticking ──────────────────────────────────────────────────────

    #[test]
    fn tick_skips_until_due() {
        let (mut e, buf, _) = engine_with(Config::default().with_fps(10));
        let t0 = e.frame_clock().last_frame;
        let mut hooks = Recorder::default();

        assert!(!e.tick(&mut hooks, t0 + Duration::from_millis(50)).unwrap());
        assert!(hooks.deltas.is_empty());

        assert!(e.tick(&mut hooks, t0 + Duration::from_millis(120)).unwrap());
        assert_eq!(hooks.deltas, vec![Duration::from_millis(120)]);
        assert_eq!(e.clock(), 1);
        assert_eq!(e.delta(), Duration::from_millis(120));
        assert_eq!(buf.text(), "frame");
        assert_eq!(buf.flushes(), 1);
    }

    #[test]
    fn tick_resamples_viewport_before_update() {
        let (mut e, _, tty) = engine_with(Config::default().with_fps(10));
        let t0 = e.frame_clock().last_frame;
        let mut hooks = Recorder::default();

        tty.resize(Some(Viewport::new(100, 30)));
        e.tick(&mut hooks, t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(hooks.widths, vec![100]);
    }

    #[test]
    fn failing_update_becomes_callback_failure() {
        let (mut e, _, _) = engine_with(Config::default().with_fps(10));
        let t0 = e.frame_clock().last_frame;
        let mut hooks = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let err = e.tick(&mut hooks, t0 + Duration::from_secs(1)).unwrap_err();
        let Error::UncaughtCallbackFailure(report) = err else {
            panic!("expected callback failure, got {err:?}");
        };
        assert_eq!(report.kind, "error");
        assert_eq!(report.message, "update failed");
    }

    #[test]
    fn set_fps_at_runtime() {
        let (mut e, _, _) = engine();
        e.set_fps(60).unwrap();
        assert_eq!(e.fps(), 60);
        assert!(e.set_fps(0).is_err());
        assert_eq!(e.fps(), 60);
    }

    #[test]
    fn quit_sets_flag() {
        let (mut e, _, _) = engine();
        assert!(!e.quit_requested());
        e.quit();
        assert!(e.quit_requested());
    }

    // ── Input ────────────────────────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn get_char_reads_from_input_fd() {
        use std::os::unix::io::AsRawFd;
        use std::os::unix::net::UnixStream;

        let (ours, mut theirs) = UnixStream::pair().unwrap();
        let e = Engine::with_io(
            Config::default(),
            ours.as_raw_fd(),
            Box::new(io::sink()),
            Box::new(FakeTty::new(&new_log())),
        )
        .unwrap();

        assert_eq!(e.get_char(Duration::ZERO), None);
        theirs.write_all(b"q").unwrap();
        assert_eq!(e.get_char(Duration::ZERO), Some('q'));
    }
}

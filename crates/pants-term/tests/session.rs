// SPDX-License-Identifier: MIT
//
// Full sessions against a scripted terminal: entry, frames, quit, the error
// overlay, and teardown, observed only through the public API.

#![cfg(unix)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::rc::Rc;
use std::time::Duration;

use pants_term::{
    Cell, Color, Config, Engine, Hooks, InputMode, NamedColor, Tty, Viewport, run_with,
};

// ─── Doubles ─────────────────────────────────────────────────────────────────

type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Default)]
struct Screen(Rc<RefCell<Vec<u8>>>);

impl Screen {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Screen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct ScriptedTty {
    journal: Journal,
    size: Rc<RefCell<Viewport>>,
    saved: bool,
}

impl Tty for ScriptedTty {
    fn is_tty(&self) -> bool {
        true
    }

    fn size(&self) -> Option<Viewport> {
        Some(*self.size.borrow())
    }

    fn enter_mode(&mut self, mode: InputMode) -> io::Result<()> {
        self.saved = true;
        self.journal.borrow_mut().push(format!("tty: enter {mode:?}"));
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.saved) {
            self.journal.borrow_mut().push("tty: restore".to_owned());
        }
        Ok(())
    }
}

struct Harness {
    engine: Engine,
    screen: Screen,
    journal: Journal,
    size: Rc<RefCell<Viewport>>,
    keys: UnixStream,
    _input: UnixStream,
}

fn harness(config: Config) -> Harness {
    let journal = Journal::default();
    let size = Rc::new(RefCell::new(Viewport::new(20, 5)));
    let screen = Screen::default();
    let (input, keys) = UnixStream::pair().unwrap();
    let tty = ScriptedTty {
        journal: Rc::clone(&journal),
        size: Rc::clone(&size),
        saved: false,
    };
    let engine = Engine::with_io(
        config.with_overlay_pause(Duration::from_millis(5)),
        input.as_raw_fd(),
        Box::new(screen.clone()),
        Box::new(tty),
    )
    .unwrap();
    Harness {
        engine,
        screen,
        journal,
        size,
        keys,
        _input: input,
    }
}

// ─── Hooks Under Test ────────────────────────────────────────────────────────

/// Draws a marker each frame and quits on `q`.
struct Marker {
    journal: Journal,
    widths: Vec<u16>,
    resize_to: Option<Rc<RefCell<Viewport>>>,
}

impl Hooks for Marker {
    fn start(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        self.journal.borrow_mut().push("start".to_owned());
        engine.set_fps(500)?;
        engine.write_data(&[[Cell::new('#'), Cell::new('#')]], 1, 1)?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        self.widths.push(engine.width());
        if let Some(size) = self.resize_to.take() {
            *size.borrow_mut() = Viewport::new(30, 5);
        }
        engine.draw_str("frame", -5, 0, NamedColor::BrightCyan.into(), Color::BLACK)?;
        if engine.get_char(Duration::ZERO) == Some('q') {
            engine.quit();
        }
        Ok(())
    }

    fn kill(&mut self) {
        self.journal.borrow_mut().push("kill".to_owned());
    }
}

/// Fails on the second frame.
struct Flaky {
    journal: Journal,
}

impl Hooks for Flaky {
    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> anyhow::Result<()> {
        if engine.clock() == 2 {
            let grid = vec![vec![Cell::new('a')], vec![]];
            engine.write_data(&grid, 0, 0)?;
        }
        Ok(())
    }

    fn kill(&mut self) {
        self.journal.borrow_mut().push("kill".to_owned());
    }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[test]
fn session_runs_frames_until_quit_key() {
    let mut h = harness(Config::default());
    h.keys.write_all(b"q").unwrap();
    let mut hooks = Marker {
        journal: Rc::clone(&h.journal),
        widths: Vec::new(),
        resize_to: None,
    };

    run_with(&mut h.engine, &mut hooks).unwrap();

    assert_eq!(
        *h.journal.borrow(),
        vec!["tty: enter Cbreak", "start", "kill", "tty: restore"]
    );
    assert_eq!(h.engine.fps(), 500);
    assert_eq!(h.engine.clock(), 1);

    let text = h.screen.text();
    // Setup, then the start hook's grid, homed.
    assert!(text.starts_with("\x1b[?25l\x1b[2J\x1b[f\x1b[2;2H"));
    assert!(text.contains("#\x1b[0m\r\n\x1b[1C\x1b[f"));
    // x = -5 on a 20-wide screen lands on column 15; all five chars fit.
    assert!(text.contains("\x1b[1;16H\x1b[0m\x1b[96m\x1b[40mf"));
    assert!(text.ends_with("\x1b[?25h\x1b[0m\x1b[2J\x1b[f"));
}

#[test]
fn resize_is_seen_on_the_next_frame() {
    let mut h = harness(Config::default().with_fps(500));
    let mut hooks = Marker {
        journal: Rc::clone(&h.journal),
        widths: Vec::new(),
        resize_to: Some(Rc::clone(&h.size)),
    };

    // Quit arrives only after a couple of frames have run.
    let mut keys = h.keys.try_clone().unwrap();
    let typist = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        keys.write_all(b"q").unwrap();
    });

    run_with(&mut h.engine, &mut hooks).unwrap();
    typist.join().unwrap();

    assert!(hooks.widths.len() >= 2, "{:?}", hooks.widths);
    assert_eq!(hooks.widths[0], 20);
    assert!(hooks.widths[1..].iter().all(|&w| w == 30));
}

#[test]
fn failure_shows_overlay_until_acknowledged() {
    let mut h = harness(Config::default().with_fps(500).with_ack_key('x'));
    h.keys.write_all(b"qx").unwrap();
    let mut hooks = Flaky {
        journal: Rc::clone(&h.journal),
    };

    run_with(&mut h.engine, &mut hooks).unwrap();

    assert_eq!(h.engine.clock(), 2);
    assert_eq!(
        *h.journal.borrow(),
        vec!["tty: enter Cbreak", "kill", "tty: restore"]
    );

    let text = h.screen.text();
    assert!(text.contains("Oh no, ansi-pants encountered an error!\r\n"));
    assert!(text.contains("error: irregular grid: row 1 has 0 cells, expected 1\r\n"));
    assert!(text.contains("Press x to exit.\r\n"));
    assert!(text.ends_with("\x1b[?25h\x1b[0m\x1b[2J\x1b[f"));
}

#[test]
fn zero_fps_never_enters() {
    let screen = Screen::default();
    let journal = Journal::default();
    let tty = ScriptedTty {
        journal: Rc::clone(&journal),
        size: Rc::new(RefCell::new(Viewport::FALLBACK)),
        saved: false,
    };
    let result = Engine::with_io(
        Config::default().with_fps(0),
        -1,
        Box::new(screen.clone()),
        Box::new(tty),
    );
    assert!(matches!(result, Err(pants_term::Error::InvalidFrameRate(0))));
    assert!(journal.borrow().is_empty());
    assert!(screen.text().is_empty());
}

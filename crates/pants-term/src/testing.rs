// SPDX-License-Identifier: MIT
//
// Test doubles shared by the unit tests: an in-memory writer whose contents
// outlive the `Box<dyn Write>` it is moved into, and a `Tty` that records
// every call into a log shared with the test.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::terminal::{InputMode, Tty};
use crate::viewport::Viewport;

// ─── SharedBuf ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct BufState {
    bytes: Vec<u8>,
    flushes: usize,
}

/// A cloneable `Vec<u8>` writer. Clones share the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf {
    state: Rc<RefCell<BufState>>,
}

impl SharedBuf {
    pub fn contents(&self) -> Vec<u8> {
        self.state.borrow().bytes.clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.state.borrow().bytes).into_owned()
    }

    pub fn flushes(&self) -> usize {
        self.state.borrow().flushes
    }

    pub fn clear(&self) {
        self.state.borrow_mut().bytes.clear();
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.borrow_mut().bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state.borrow_mut().flushes += 1;
        Ok(())
    }
}

// ─── FakeTty ─────────────────────────────────────────────────────────────────

/// Shared event log. Hooks under test push into the same log so ordering
/// between hook calls and terminal calls can be asserted.
pub type Log = Rc<RefCell<Vec<String>>>;

/// A terminal that only records what was asked of it.
#[derive(Debug, Clone)]
pub struct FakeTty {
    pub log: Log,
    pub interactive: bool,
    pub size: Rc<RefCell<Option<Viewport>>>,
    entered: bool,
}

impl FakeTty {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            interactive: true,
            size: Rc::new(RefCell::new(Some(Viewport::new(40, 10)))),
            entered: false,
        }
    }

    pub fn not_a_tty(log: &Log) -> Self {
        Self {
            interactive: false,
            ..Self::new(log)
        }
    }

    /// Change what later size queries return.
    pub fn resize(&self, size: Option<Viewport>) {
        *self.size.borrow_mut() = size;
    }
}

impl Tty for FakeTty {
    fn is_tty(&self) -> bool {
        self.interactive
    }

    fn size(&self) -> Option<Viewport> {
        *self.size.borrow()
    }

    fn enter_mode(&mut self, mode: InputMode) -> io::Result<()> {
        self.entered = true;
        self.log.borrow_mut().push(format!("enter {mode:?}"));
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        if self.entered {
            self.entered = false;
            self.log.borrow_mut().push("restore".to_owned());
        }
        Ok(())
    }
}

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

//! Key events and bounded user-input buffers.
//!
//! The 4x4 keypad carries digits, `*`, `#`, and four function keys
//! mapped to prev-field / next-field / select / back. The driver
//! reports a `Press` immediately and a separate `Hold` once the key has
//! been down for [`crate::config::KEYPAD_LONG_PRESS_MS`].

use heapless::String;

use crate::config::{MAX_CODE_LEN, MAX_MINUTES_DIGITS};
use crate::menu::Screen;

/// Logical keypad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// `0`..=`9`.
    Digit(u8),
    /// `*` - clears the code attempt during defusal code entry.
    Star,
    /// `#` - submits the code attempt during defusal code entry.
    Hash,
    /// `a` - focus previous menu line.
    FocusPrev,
    /// `b` - focus next menu line.
    FocusNext,
    /// `c` - activate the focused line.
    Select,
    /// `d` - back to the main menu / stop.
    Back,
}

impl Key {
    /// The character this key contributes to an entry buffer.
    pub fn as_char(self) -> Option<char> {
        match self {
            Key::Digit(d) if d <= 9 => Some((b'0' + d) as char),
            _ => None,
        }
    }
}

/// Press fires immediately; Hold fires after the long-press time,
/// independently of the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyKind {
    Press,
    Hold,
}

/// One discrete keypad event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: Key,
    pub kind: KeyKind,
}

/// Bounded entry buffer with reset-on-overflow ("ring") semantics.
///
/// Typing past the capacity wipes the buffer and restarts at position
/// zero - intentional behavior, not an overflow guard. Refocusing a
/// field marks it for restart: the old value stays visible until the
/// next keypress, which begins a fresh entry.
#[derive(Debug, Default)]
pub struct EntryBuffer<const N: usize> {
    buf: String<N>,
    restart: bool,
}

impl<const N: usize> EntryBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            restart: false,
        }
    }

    /// Append a character, wiping first if full or marked for restart.
    pub fn push(&mut self, c: char) {
        if self.restart || self.buf.len() >= N {
            self.buf.clear();
            self.restart = false;
        }
        let _ = self.buf.push(c);
    }

    /// Wipe the buffer outright.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.restart = false;
    }

    /// Next push starts a fresh entry; current value stays readable.
    pub fn mark_restart(&mut self) {
        self.restart = true;
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Parse as a minutes count; empty or non-numeric reads as zero,
    /// which the start operations reject as invalid input.
    pub fn minutes(&self) -> u32 {
        self.buf.parse().unwrap_or(0)
    }
}

/// The operator-entry fields across both setup screens. The Timer setup
/// screen is shared by Timer and Domination; Defusal has its own with a
/// bomb-time and code line.
#[derive(Debug, Default)]
pub struct SetupFields {
    pub delay: EntryBuffer<MAX_MINUTES_DIGITS>,
    pub game: EntryBuffer<MAX_MINUTES_DIGITS>,
    pub bomb: EntryBuffer<MAX_MINUTES_DIGITS>,
    pub code: EntryBuffer<MAX_CODE_LEN>,
}

impl SetupFields {
    pub const fn new() -> Self {
        Self {
            delay: EntryBuffer::new(),
            game: EntryBuffer::new(),
            bomb: EntryBuffer::new(),
            code: EntryBuffer::new(),
        }
    }

    /// Route a typed character to whichever field the focused line of
    /// the current screen addresses. Non-field lines swallow it.
    pub fn push(&mut self, screen: Screen, line: usize, c: char) {
        match (screen, line) {
            (Screen::TimerSetup, 0) | (Screen::DefusalSetup, 0) => self.delay.push(c),
            (Screen::TimerSetup, 1) => self.game.push(c),
            (Screen::DefusalSetup, 1) => self.bomb.push(c),
            (Screen::DefusalSetup, 2) => self.code.push(c),
            _ => {}
        }
    }

    /// Hard-clear the field behind a setup line (activating a field
    /// line wipes it).
    pub fn clear_line(&mut self, screen: Screen, line: usize) {
        match (screen, line) {
            (Screen::TimerSetup, 0) | (Screen::DefusalSetup, 0) => self.delay.clear(),
            (Screen::TimerSetup, 1) => self.game.clear(),
            (Screen::DefusalSetup, 1) => self.bomb.clear(),
            (Screen::DefusalSetup, 2) => self.code.clear(),
            _ => {}
        }
    }

    /// Wipe everything; done on each setup-screen entry.
    pub fn clear_all(&mut self) {
        self.delay.clear();
        self.game.clear();
        self.bomb.clear();
        self.code.clear();
    }

    /// Focus moved: every field restarts on its next keypress.
    pub fn mark_restart_all(&mut self) {
        self.delay.mark_restart();
        self.game.mark_restart();
        self.bomb.mark_restart();
        self.code.mark_restart();
    }
}

//! Bench doubles for every hardware collaborator.
//!
//! These run the full engine on the host: a manually advanced clock, a
//! scripted keypad, a character-cell panel you can assert against, an
//! audio sink that counts tones and siren pulses, settable team-button
//! levels, and a plain-array menu widget. They are compiled into the
//! crate (not test-gated) so the integration tests and any host demo
//! can share them.

use heapless::Deque;
use heapless::String;

use crate::config::{LCD_COLS, LCD_ROWS};
use crate::input::{Key, KeyEvent, KeyKind, SetupFields};

const COLS: usize = LCD_COLS as usize;
const ROWS: usize = LCD_ROWS as usize;
use crate::io::{Audio, Clock, Display, Keypad, TeamButtons};
use crate::menu::{MenuEvent, MenuNav, Screen};

/// Manually advanced millisecond clock. [`Clock::pause_ms`] advances it
/// too, so UI dwells consume simulated time exactly like real stalls.
#[derive(Debug, Default)]
pub struct SimClock {
    now: u64,
}

impl SimClock {
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn pause_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }
}

/// Keypad fed from a script; each tick pops one event.
#[derive(Debug, Default)]
pub struct ScriptedKeypad {
    queue: Deque<KeyEvent, 32>,
}

impl ScriptedKeypad {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    pub fn press(&mut self, key: Key) {
        let _ = self.queue.push_back(KeyEvent {
            key,
            kind: KeyKind::Press,
        });
    }

    pub fn hold(&mut self, key: Key) {
        let _ = self.queue.push_back(KeyEvent {
            key,
            kind: KeyKind::Hold,
        });
    }

    /// Queue a digit sequence, e.g. a minutes entry or a code attempt.
    pub fn type_digits(&mut self, digits: &str) {
        for c in digits.chars() {
            if let Some(d) = c.to_digit(10) {
                self.press(Key::Digit(d as u8));
            }
        }
    }
}

impl Keypad for ScriptedKeypad {
    fn poll(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }
}

/// 16x2 character grid mirroring the panel, plus the last progress-bar
/// draw for gesture assertions.
#[derive(Debug)]
pub struct SimDisplay {
    cells: [[char; COLS]; ROWS],
    pub last_progress: Option<(u32, u32)>,
    pub clears: u32,
}

impl SimDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[' '; COLS]; ROWS],
            last_progress: None,
            clears: 0,
        }
    }

    /// Row contents as text, trailing spaces included.
    pub fn row(&self, row: usize) -> String<COLS> {
        let mut out = String::new();
        for c in self.cells[row] {
            let _ = out.push(c);
        }
        out
    }
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SimDisplay {
    fn write_text(&mut self, text: &str, col: u8, row: u8, clear_first: bool) {
        if clear_first {
            self.cells = [[' '; COLS]; ROWS];
            self.clears += 1;
        }
        let row = usize::from(row).min(ROWS - 1);
        let mut col = usize::from(col);
        for c in text.chars() {
            if col >= COLS {
                break;
            }
            self.cells[row][col] = c;
            col += 1;
        }
    }

    fn draw_progress(&mut self, value: u32, max: u32) {
        self.last_progress = Some((value, max));
    }
}

/// Audio sink that records what would have sounded.
#[derive(Debug, Default)]
pub struct SimAudio {
    pub beep_count: u32,
    pub last_beep: Option<(u16, u32)>,
    pub siren_on: bool,
    /// Rising edges of the siren output.
    pub siren_pulses: u32,
}

impl SimAudio {
    pub const fn new() -> Self {
        Self {
            beep_count: 0,
            last_beep: None,
            siren_on: false,
            siren_pulses: 0,
        }
    }
}

impl Audio for SimAudio {
    fn beep(&mut self, freq_hz: u16, duration_ms: u32) {
        self.beep_count += 1;
        self.last_beep = Some((freq_hz, duration_ms));
    }

    fn set_siren(&mut self, on: bool) {
        if on && !self.siren_on {
            self.siren_pulses += 1;
        }
        self.siren_on = on;
    }
}

/// Team-button levels set directly by the test.
#[derive(Debug, Default)]
pub struct SimButtons {
    pub team1: bool,
    pub team2: bool,
}

impl SimButtons {
    pub const fn new() -> Self {
        Self {
            team1: false,
            team2: false,
        }
    }
}

impl TeamButtons for SimButtons {
    fn team1_held(&mut self) -> bool {
        self.team1
    }

    fn team2_held(&mut self) -> bool {
        self.team2
    }
}

/// Menu double: plain screen/focus state with the real line layout.
///
/// Main lists Defusal, Domination, Timer, Zone Control top to bottom;
/// the setup screens put their entry fields first and START last. Focus
/// clamps at both ends like the scrolling widget on the device.
#[derive(Debug)]
pub struct SimMenu {
    screen: Screen,
    focus: usize,
    pub refreshes: u32,
}

impl SimMenu {
    pub const fn new() -> Self {
        Self {
            screen: Screen::Main,
            focus: 0,
            refreshes: 0,
        }
    }

    fn line_count(screen: Screen) -> usize {
        match screen {
            Screen::Main => 4,
            Screen::TimerSetup => 3,
            Screen::DefusalSetup => 4,
        }
    }
}

impl Default for SimMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuNav for SimMenu {
    fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn focus_next(&mut self) {
        let last = Self::line_count(self.screen) - 1;
        if self.focus < last {
            self.focus += 1;
        }
    }

    fn select(&mut self) -> Option<MenuEvent> {
        match (self.screen, self.focus) {
            (Screen::Main, 0) => Some(MenuEvent::OpenDefusal),
            (Screen::Main, 1) => Some(MenuEvent::OpenDomination),
            (Screen::Main, 2) => Some(MenuEvent::OpenTimer),
            (Screen::Main, 3) => Some(MenuEvent::OpenZoneControl),
            (Screen::TimerSetup, line @ 0..=1) => Some(MenuEvent::EditLine(line)),
            (Screen::TimerSetup, 2) => Some(MenuEvent::Start),
            (Screen::DefusalSetup, line @ 0..=2) => Some(MenuEvent::EditLine(line)),
            (Screen::DefusalSetup, 3) => Some(MenuEvent::Start),
            _ => None,
        }
    }

    fn open(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = 0;
    }

    fn set_focus(&mut self, line: usize) {
        self.focus = line.min(Self::line_count(self.screen) - 1);
    }

    fn focused_line(&self) -> usize {
        self.focus
    }

    fn current_screen(&self) -> Screen {
        self.screen
    }

    fn refresh(&mut self, _fields: &SetupFields) {
        self.refreshes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_grid_tracks_writes_and_clears() {
        let mut d = SimDisplay::new();
        d.write_text("T-BAG BOMB", 3, 0, true);
        assert_eq!(d.row(0).as_str(), "   T-BAG BOMB   ");
        d.write_text("overwrites past the edge", 10, 1, false);
        assert_eq!(d.row(1).as_str(), "          overwr");
        d.write_text("", 0, 0, true);
        assert_eq!(d.row(0).as_str(), "                ");
        assert_eq!(d.clears, 2);
    }

    #[test]
    fn menu_focus_clamps_at_both_ends() {
        let mut m = SimMenu::new();
        m.focus_prev();
        assert_eq!(m.focused_line(), 0);
        for _ in 0..10 {
            m.focus_next();
        }
        assert_eq!(m.focused_line(), 3);
        m.open(Screen::TimerSetup);
        assert_eq!(m.focused_line(), 0);
        for _ in 0..10 {
            m.focus_next();
        }
        assert_eq!(m.select(), Some(MenuEvent::Start));
    }

    #[test]
    fn siren_edges_are_counted_once() {
        let mut a = SimAudio::new();
        a.set_siren(true);
        a.set_siren(true);
        a.set_siren(false);
        a.set_siren(true);
        assert_eq!(a.siren_pulses, 2);
        assert!(a.siren_on);
    }
}

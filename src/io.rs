//! Hardware collaborator contracts.
//!
//! The game engine is written against these traits so the same logic
//! runs on the bench (see [`crate::sim`]) and on the target. Everything
//! is polled from the single tick function; none of these calls may
//! block, except [`Clock::pause_ms`] which exists precisely for the
//! deliberate UI dwells.

use crate::input::KeyEvent;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since power-up. Never goes backwards.
    fn now_ms(&self) -> u64;

    /// Bounded blocking pause for banners and confirmation dwells.
    /// Stalls the whole tick on purpose, siren auto-stop included.
    fn pause_ms(&mut self, ms: u32);
}

/// Keypad event source. The driver owns debounce, hold timing, and the
/// row/column matrix decode; we only see discrete events.
pub trait Keypad {
    /// Dequeue the next key event, if any. Called exactly once per tick.
    fn poll(&mut self) -> Option<KeyEvent>;
}

/// 16x2 character panel with a full-width bar graph on the bottom row.
/// (col, row) is 0-based from the top-left.
pub trait Display {
    /// Render `text` at (col, row), optionally clearing the panel first.
    fn write_text(&mut self, text: &str, col: u8, row: u8, clear_first: bool);

    /// Draw the progress bar as `value` out of `max`.
    fn draw_progress(&mut self, value: u32, max: u32);
}

/// Buzzer and siren relay.
pub trait Audio {
    /// Non-blocking tone; the sink stops it after `duration_ms`.
    fn beep(&mut self, freq_hz: u16, duration_ms: u32);

    /// Level-triggered siren output pin.
    fn set_siren(&mut self, on: bool);
}

/// The two physical team buttons (active-low inputs, polled each tick).
pub trait TeamButtons {
    fn team1_held(&mut self) -> bool;
    fn team2_held(&mut self) -> bool;
}

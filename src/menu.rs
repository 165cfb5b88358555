//! Contract for the external menu/screen navigation widget.
//!
//! The widget owns line focus, text layout, and rendering of the setup
//! screens; the engine only tells it to move focus, activate the
//! focused line, or change screens, and asks which line is focused.
//! A bench double lives in [`crate::sim`]; the firmware binary carries
//! a small LCD-backed implementation.

use crate::input::SetupFields;

/// Which screen the widget is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Mode list: Defusal, Domination, Timer, Zone Control.
    Main,
    /// Delay-minutes, game-minutes, START. Shared by Timer and
    /// Domination.
    TimerSetup,
    /// Delay-minutes, bomb-minutes, code, START.
    DefusalSetup,
}

/// What activating the focused line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    OpenTimer,
    OpenDomination,
    OpenZoneControl,
    OpenDefusal,
    /// An entry-field line was activated; the engine clears that field.
    EditLine(usize),
    /// The START line was activated.
    Start,
}

/// Navigation surface of the menu widget.
pub trait MenuNav {
    /// Move focus one line up (clamps at the first line).
    fn focus_prev(&mut self);

    /// Move focus one line down (clamps at the last line).
    fn focus_next(&mut self);

    /// Activate the focused line.
    fn select(&mut self) -> Option<MenuEvent>;

    /// Switch to `screen` and focus its first line.
    fn open(&mut self, screen: Screen);

    fn set_focus(&mut self, line: usize);

    fn focused_line(&self) -> usize;

    fn current_screen(&self) -> Screen;

    /// Re-render the current screen, including live field values.
    fn refresh(&mut self, fields: &SetupFields);
}

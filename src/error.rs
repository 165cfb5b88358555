//! Unified error type for bombprop.
//!
//! Every error here is user-facing and non-fatal: it is reported on the
//! panel at the point of detection and the device keeps running. Start
//! and code-submit operations return these as values; nothing is thrown
//! past the tick loop because there is no caller above it.

/// Numeric entry field on one of the setup screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Pre-game delay, minutes.
    DelayMinutes,
    /// Game length, minutes (Timer / Domination).
    GameMinutes,
    /// Bomb countdown, minutes (Defusal).
    BombMinutes,
}

impl Field {
    /// Banner text naming the field on the error screen.
    pub fn banner(self) -> &'static str {
        match self {
            Field::DelayMinutes => "* DELAY TIME *",
            Field::GameMinutes => "*  GAME TIME  *",
            Field::BombMinutes => "* BOMB TIME *",
        }
    }

    /// Setup-screen line the field sits on, for returning focus to it.
    pub fn line(self) -> usize {
        match self {
            Field::DelayMinutes => 0,
            Field::GameMinutes | Field::BombMinutes => 1,
        }
    }
}

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A required numeric field parsed to zero (or was empty) when
    /// starting a mode. Carries the offending field.
    InvalidInput(Field),

    /// Entered defusal code did not match the expected code.
    BadCode,
}

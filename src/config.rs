//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, tone pitches, and display geometry live here
//! so they can be tuned in one place. Durations are milliseconds unless
//! the name says otherwise.

// Display

/// Character columns on the LCD.
pub const LCD_COLS: u8 = 16;

/// Character rows on the LCD.
pub const LCD_ROWS: u8 = 2;

/// Countdown / score redraw interval. The panel is not refreshed more
/// often than this while a mode is counting.
pub const DISPLAY_REFRESH_MS: u64 = 1_000;

/// Redraw interval while the defusal code echo is on screen; typed
/// characters must show up promptly.
pub const CODE_REFRESH_MS: u64 = 100;

/// How long the power-up splash stays on screen.
pub const SPLASH_DWELL_MS: u32 = 3_000;

// Input

/// Maximum digits in a minutes entry field.
pub const MAX_MINUTES_DIGITS: usize = 3;

/// Maximum characters in the defusal code.
pub const MAX_CODE_LEN: usize = 6;

/// Hold time before the keypad driver reports a `Hold` event in addition
/// to the `Press`. Configured into the driver, documented here.
pub const KEYPAD_LONG_PRESS_MS: u32 = 10_000;

// Gestures (team buttons)

/// Continuous hold required to flip capture ownership in Domination and
/// Zone Control.
pub const TEAM_SWITCH_TIME_MS: u64 = 5_000;

/// Continuous hold required to arm the bomb (button-variant Defusal).
pub const BOMB_ARM_TIME_MS: u64 = 5_000;

/// Continuous hold required to disarm the bomb (button-variant Defusal).
/// Deliberately longer than arming.
pub const BOMB_DEFUSE_TIME_MS: u64 = 10_000;

// Siren

/// Siren auto-stop threshold while a mode is running (phase-start signal).
pub const SIREN_GAME_START_MS: u64 = 8_000;

/// Siren auto-stop threshold when no mode is running (end-of-game signal).
pub const SIREN_GAME_END_MS: u64 = 12_000;

/// Delay between a defusal outcome banner (DISARMED / EXPLODED) and the
/// end-of-round siren, so the banner gets read before the noise starts.
pub const OUTCOME_SIREN_DELAY_MS: u64 = 2_000;

// Tones

/// Keypress feedback tone, generic keys.
pub const KEY_TONE_GENERIC_HZ: u16 = 1_000;

/// Keypress feedback tone, confirm/select key.
pub const KEY_TONE_CONFIRM_HZ: u16 = 1_320;

/// Keypress feedback tone, back/cancel key.
pub const KEY_TONE_BACK_HZ: u16 = 880;

/// Keypress feedback tone length.
pub const KEY_TONE_MS: u32 = 100;

/// Confirmation tone on a completed capture or arm gesture.
pub const CAPTURE_TONE_HZ: u16 = 700;
pub const CAPTURE_TONE_MS: u32 = 2_000;

/// Armed-bomb beep pitch and length (125 ms, same as the CSGO bomb).
pub const ARMED_BEEP_HZ: u16 = 2_700;
pub const ARMED_BEEP_MS: u32 = 125;

// UI pauses (deliberate blocking dwells, not scheduling primitives)

/// Dwell for the invalid-input banner before focus returns to the field.
pub const INVALID_INPUT_DWELL_MS: u32 = 3_000;

/// Dwell for the BAD CODE banner while the bomb is armed.
pub const BAD_CODE_DWELL_ARMED_MS: u32 = 1_000;

/// Dwell for the BAD CODE banner during code-arming.
pub const BAD_CODE_DWELL_READY_MS: u32 = 1_500;

/// Pause after the arm gesture completes, before the armed countdown
/// starts ticking.
pub const ARM_CONFIRM_PAUSE_MS: u32 = 1_000;

// Defusal penalties

/// Remaining-time clamp applied by the second bad code. A bomb whose
/// total time is at or below this beeps at the fastest cadence
/// regardless of elapsed fraction.
pub const PENALTY_FLOOR_MS: u64 = 15_000;

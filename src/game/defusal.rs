//! Defusal mode: optional prep delay, then a bomb that is armed and
//! disarmed either by entering a code on the keypad or by holding a
//! team button for a fixed time. Wrong codes while armed shrink the
//! remaining time - half, then a 15 s clamp, then detonation. The
//! round ends Disarmed or Exploded; either way the end-of-round siren
//! waits a moment so the outcome banner gets read first.

use heapless::String;

use crate::config::{
    ARMED_BEEP_HZ, ARMED_BEEP_MS, ARM_CONFIRM_PAUSE_MS, BAD_CODE_DWELL_ARMED_MS,
    BAD_CODE_DWELL_READY_MS, BOMB_ARM_TIME_MS, BOMB_DEFUSE_TIME_MS, CAPTURE_TONE_HZ,
    CAPTURE_TONE_MS, CODE_REFRESH_MS, DISPLAY_REFRESH_MS, MAX_CODE_LEN, OUTCOME_SIREN_DELAY_MS,
    PENALTY_FLOOR_MS,
};
use crate::error::{Error, Field};
use crate::game::{minutes_to_ms, Throttle};
use crate::gesture::{GesturePoll, HoldGesture};
use crate::io::{Audio, Clock, Display};
use crate::screen::draw_time;
use crate::siren::Siren;

/// Where the round currently stands. Disarmed and Exploded are
/// terminal for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DefusalPhase {
    Delay,
    Ready,
    Armed,
    Disarmed,
    Exploded,
}

#[derive(Debug)]
pub struct DefusalGame {
    delay_ms: u64,
    /// Total bomb time; shrunk in place by bad-code penalties.
    pub bomb_total_ms: u64,
    started_at: u64,
    pub phase: DefusalPhase,
    /// Code variant (operator entered a code at setup) vs button variant.
    pub use_code: bool,
    expected: String<MAX_CODE_LEN>,
    entered: String<MAX_CODE_LEN>,
    /// Bad codes seen so far, capped at 3.
    pub bad_codes: u8,
    pub buttons: HoldGesture,
    banner_drawn: bool,
    redraw: Throttle,
    last_beep: u64,
    outcome_at: Option<u64>,
    end_siren_fired: bool,
}

impl DefusalGame {
    /// Validate the bomb time and begin. A zero delay skips straight to
    /// Ready; a non-empty code selects the code variant.
    pub fn start(delay_min: u32, bomb_min: u32, code: &str, now: u64) -> Result<Self, Error> {
        if bomb_min == 0 {
            return Err(Error::InvalidInput(Field::BombMinutes));
        }
        let delay_ms = minutes_to_ms(delay_min);
        let mut expected = String::new();
        let _ = expected.push_str(code);
        Ok(Self {
            delay_ms,
            bomb_total_ms: minutes_to_ms(bomb_min),
            started_at: now,
            phase: if delay_ms > 0 {
                DefusalPhase::Delay
            } else {
                DefusalPhase::Ready
            },
            use_code: !code.is_empty(),
            expected,
            entered: String::new(),
            bad_codes: 0,
            buttons: HoldGesture::new(),
            banner_drawn: false,
            redraw: Throttle::new(),
            last_beep: 0,
            outcome_at: None,
            end_siren_fired: false,
        })
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            DefusalPhase::Delay | DefusalPhase::Ready | DefusalPhase::Armed
        )
    }

    /// Keypad code entry (`*`, `#`, digits) is live once the delay is
    /// over and the round is still undecided.
    pub fn code_entry_live(&self) -> bool {
        self.use_code && matches!(self.phase, DefusalPhase::Ready | DefusalPhase::Armed)
    }

    pub fn tick<D: Display, A: Audio>(
        &mut self,
        now: u64,
        display: &mut D,
        audio: &mut A,
        siren: &mut Siren,
    ) {
        match self.phase {
            DefusalPhase::Delay => {
                if self.redraw.ready(now, DISPLAY_REFRESH_MS) {
                    if !self.banner_drawn {
                        display.write_text("PREP FOR GAME", 1, 0, true);
                        self.banner_drawn = true;
                    }
                    let elapsed = now.saturating_sub(self.started_at);
                    if elapsed >= self.delay_ms {
                        self.delay_ms = 0;
                        self.phase = DefusalPhase::Ready;
                        self.started_at = now;
                        self.banner_drawn = false;
                        siren.start(now, audio);
                    } else {
                        draw_time(display, self.delay_ms - elapsed, 5, 1);
                    }
                }
            }
            DefusalPhase::Ready => {
                self.draw_live(now, display);
            }
            DefusalPhase::Armed => {
                self.draw_live(now, display);
                let elapsed = now.saturating_sub(self.started_at);
                if elapsed > self.bomb_total_ms {
                    self.phase = DefusalPhase::Exploded;
                    display.write_text("EXPLODED", 4, 0, true);
                    display.write_text("TIME LEFT: 00:00", 0, 1, false);
                    self.outcome_at = Some(now);
                } else {
                    let wait = u64::from(beep_interval_ms(self.bomb_total_ms, elapsed));
                    if now.saturating_sub(self.last_beep) > wait {
                        self.last_beep = now;
                        audio.beep(ARMED_BEEP_HZ, ARMED_BEEP_MS);
                    }
                }
            }
            DefusalPhase::Disarmed | DefusalPhase::Exploded => {
                if !self.end_siren_fired {
                    if let Some(at) = self.outcome_at {
                        if now.saturating_sub(at) >= OUTCOME_SIREN_DELAY_MS {
                            siren.start(now, audio);
                            self.end_siren_fired = true;
                        }
                    }
                }
            }
        }
    }

    /// Ready/Armed screen: banner once, live code echo, countdown. The
    /// code variant refreshes fast so typed digits show up; the button
    /// variant yields the panel to the gesture progress bar.
    fn draw_live<D: Display>(&mut self, now: u64, display: &mut D) {
        if !self.use_code && self.buttons.in_progress() {
            return;
        }
        let interval = if self.use_code {
            CODE_REFRESH_MS
        } else {
            DISPLAY_REFRESH_MS
        };
        if !self.redraw.ready(now, interval) {
            return;
        }
        match self.phase {
            DefusalPhase::Ready => {
                if self.use_code {
                    if !self.banner_drawn {
                        display.write_text("ARM CODE:       ", 0, 0, false);
                        self.banner_drawn = true;
                    }
                    display.write_text(self.entered.as_str(), 10, 0, false);
                } else if !self.banner_drawn {
                    display.write_text("     READY      ", 0, 0, false);
                    self.banner_drawn = true;
                }
                draw_time(display, self.bomb_total_ms, 11, 1);
            }
            DefusalPhase::Armed => {
                if self.use_code {
                    if !self.banner_drawn {
                        display.write_text("ARMED: ", 0, 0, false);
                        self.banner_drawn = true;
                    }
                    display.write_text(self.entered.as_str(), 7, 0, false);
                } else if !self.banner_drawn {
                    display.write_text("     ARMED      ", 0, 0, false);
                    self.banner_drawn = true;
                }
                let elapsed = now.saturating_sub(self.started_at);
                draw_time(display, self.bomb_total_ms.saturating_sub(elapsed), 11, 1);
            }
            _ => {}
        }
        display.write_text("TIME LEFT: ", 0, 1, false);
    }

    /// Append a typed character to the code attempt, wrapping back to
    /// position zero (and blanking the echo) past six characters.
    pub fn push_code_char<D: Display>(&mut self, c: char, display: &mut D) {
        if self.entered.len() >= MAX_CODE_LEN {
            self.entered.clear();
            self.blank_code_echo(display);
        }
        let _ = self.entered.push(c);
    }

    /// Wipe the code attempt and its on-screen echo (`*` key).
    pub fn clear_entered<D: Display>(&mut self, display: &mut D) {
        self.entered.clear();
        self.blank_code_echo(display);
    }

    pub fn entered_code(&self) -> &str {
        self.entered.as_str()
    }

    fn blank_code_echo<D: Display>(&self, display: &mut D) {
        let col = if matches!(self.phase, DefusalPhase::Armed) {
            7
        } else {
            10
        };
        display.write_text("      ", col, 0, false);
    }

    /// Submit the code attempt (`#` key). In Ready a match arms the
    /// bomb and a miss only costs a banner; while Armed a match
    /// disarms and a miss applies the escalating penalty.
    pub fn submit_code<D: Display, C: Clock>(
        &mut self,
        now: u64,
        display: &mut D,
        clock: &mut C,
    ) -> Result<(), Error> {
        let ok = code_matches(self.expected.as_str(), self.entered.as_str());
        match self.phase {
            DefusalPhase::Armed => {
                if ok {
                    self.disarm(now, display);
                    Ok(())
                } else {
                    display.write_text("    BAD CODE    ", 0, 0, false);
                    clock.pause_ms(BAD_CODE_DWELL_ARMED_MS);
                    let remaining = self
                        .bomb_total_ms
                        .saturating_sub(now.saturating_sub(self.started_at));
                    match self.bad_codes {
                        0 => {
                            self.bomb_total_ms = remaining / 2;
                            self.started_at = clock.now_ms();
                        }
                        1 => {
                            if remaining > PENALTY_FLOOR_MS {
                                self.bomb_total_ms = PENALTY_FLOOR_MS;
                                self.started_at = clock.now_ms();
                            }
                        }
                        // Third strike: the bomb goes off.
                        _ => self.bomb_total_ms = 0,
                    }
                    self.bad_codes = (self.bad_codes + 1).min(3);
                    self.clear_entered(display);
                    self.banner_drawn = false;
                    Err(Error::BadCode)
                }
            }
            DefusalPhase::Ready => {
                if ok {
                    self.phase = DefusalPhase::Armed;
                    self.entered.clear();
                    display.write_text("", 0, 0, true);
                    self.started_at = clock.now_ms();
                    self.banner_drawn = false;
                    Ok(())
                } else {
                    display.write_text("    BAD CODE    ", 0, 0, false);
                    clock.pause_ms(BAD_CODE_DWELL_READY_MS);
                    self.clear_entered(display);
                    self.banner_drawn = false;
                    Err(Error::BadCode)
                }
            }
            _ => Ok(()),
        }
    }

    /// Button-variant arm/disarm gesture, serviced each tick by the
    /// scheduler. Either team button works; arming takes the short
    /// hold, disarming the long one.
    pub fn service_buttons<D: Display, A: Audio, C: Clock>(
        &mut self,
        now: u64,
        team1: bool,
        team2: bool,
        display: &mut D,
        audio: &mut A,
        clock: &mut C,
    ) {
        let armed = matches!(self.phase, DefusalPhase::Armed);
        let hold_ms = if armed {
            BOMB_DEFUSE_TIME_MS
        } else {
            BOMB_ARM_TIME_MS
        };
        match self.buttons.poll(now, team1, team2, hold_ms) {
            GesturePoll::Started(_) => {
                display.write_text("", 0, 0, true);
                self.draw_gesture_label(armed, display);
                display.draw_progress(0, hold_ms as u32);
                self.banner_drawn = false;
            }
            GesturePoll::Progress { elapsed_ms, .. } => {
                self.draw_gesture_label(armed, display);
                display.draw_progress(elapsed_ms as u32, hold_ms as u32);
                self.banner_drawn = false;
            }
            GesturePoll::Completed(_) => {
                if armed {
                    self.disarm(clock.now_ms(), display);
                } else {
                    self.phase = DefusalPhase::Armed;
                    display.write_text("", 0, 0, true);
                    audio.beep(CAPTURE_TONE_HZ, CAPTURE_TONE_MS);
                    clock.pause_ms(ARM_CONFIRM_PAUSE_MS);
                    // Countdown starts after the confirmation pause.
                    // The gesture stays latched until both buttons
                    // release, so a still-held button cannot begin the
                    // disarm hold.
                    self.started_at = clock.now_ms();
                    self.banner_drawn = false;
                }
            }
            GesturePoll::Idle => {}
        }
    }

    fn draw_gesture_label<D: Display>(&self, armed: bool, display: &mut D) {
        if armed {
            display.write_text("DISARMING", 3, 0, false);
        } else {
            display.write_text("ARMING", 5, 0, false);
        }
    }

    fn disarm<D: Display>(&mut self, now: u64, display: &mut D) {
        let remaining = self
            .bomb_total_ms
            .saturating_sub(now.saturating_sub(self.started_at));
        self.phase = DefusalPhase::Disarmed;
        display.write_text("DISARMED", 4, 0, true);
        display.write_text("TIME LEFT: ", 0, 1, false);
        draw_time(display, remaining, 11, 1);
        self.outcome_at = Some(now);
    }
}

/// Compare a code attempt against the expected code across exactly
/// [`MAX_CODE_LEN`] slots, short entries padded with NUL. Breaks at the
/// first mismatch - kept for behavioral fidelity, not as a security
/// property.
pub fn code_matches(expected: &str, entered: &str) -> bool {
    let a = expected.as_bytes();
    let b = entered.as_bytes();
    for i in 0..MAX_CODE_LEN {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        if x != y {
            return false;
        }
    }
    true
}

/// Armed-bomb beep cadence as a step function of the remaining
/// fraction. The bucket comparisons are deliberately kept exactly as
/// shipped (`>60`, `>40`, ...): a boundary value falls into the faster
/// bucket. A bomb shrunk to 15 s or less always beeps at the fastest
/// rate.
pub fn beep_interval_ms(total_ms: u64, elapsed_ms: u64) -> u32 {
    if total_ms <= PENALTY_FLOOR_MS {
        return 200;
    }
    let perc_left = 100 - (elapsed_ms * 100) / total_ms;
    if perc_left > 60 {
        10_000
    } else if perc_left > 40 {
        5_000
    } else if perc_left > 20 {
        3_000
    } else if perc_left > 10 {
        1_000
    } else {
        200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimClock, SimDisplay};

    #[test]
    fn code_compare_matches_equal_codes() {
        for code in ["", "1", "123", "123456"] {
            assert!(code_matches(code, code));
        }
    }

    #[test]
    fn code_compare_rejects_any_difference() {
        assert!(!code_matches("123456", "123457"));
        assert!(!code_matches("123456", "12345"));
        assert!(!code_matches("12345", "123456"));
        assert!(!code_matches("1", ""));
    }

    #[test]
    fn beep_interval_buckets_at_literal_boundaries() {
        let total = 100_000;
        // percent remaining: 61 / 60 / 40 / 20 / 10 / 9
        assert_eq!(beep_interval_ms(total, 39_000), 10_000);
        assert_eq!(beep_interval_ms(total, 40_000), 5_000);
        assert_eq!(beep_interval_ms(total, 60_000), 3_000);
        assert_eq!(beep_interval_ms(total, 80_000), 1_000);
        assert_eq!(beep_interval_ms(total, 90_000), 200);
        assert_eq!(beep_interval_ms(total, 91_000), 200);
    }

    #[test]
    fn beep_interval_forced_fast_when_total_small() {
        assert_eq!(beep_interval_ms(15_000, 0), 200);
        assert_eq!(beep_interval_ms(12_000, 1_000), 200);
        assert_eq!(beep_interval_ms(15_001, 0), 10_000);
    }

    #[test]
    fn start_rejects_zero_bomb_minutes() {
        assert_eq!(
            DefusalGame::start(1, 0, "", 0).unwrap_err(),
            Error::InvalidInput(Field::BombMinutes)
        );
    }

    #[test]
    fn zero_delay_skips_straight_to_ready() {
        let g = DefusalGame::start(0, 1, "", 0).unwrap();
        assert_eq!(g.phase, DefusalPhase::Ready);
        assert!(!g.use_code);

        let g = DefusalGame::start(1, 1, "42", 0).unwrap();
        assert_eq!(g.phase, DefusalPhase::Delay);
        assert!(g.use_code);
    }

    fn armed_game(bomb_min: u32, code: &str) -> (DefusalGame, SimDisplay, SimClock) {
        let mut display = SimDisplay::new();
        let mut clock = SimClock::new();
        let mut g = DefusalGame::start(0, bomb_min, code, 0).unwrap();
        for c in code.chars() {
            g.push_code_char(c, &mut display);
        }
        g.submit_code(clock.now_ms(), &mut display, &mut clock)
            .unwrap();
        assert_eq!(g.phase, DefusalPhase::Armed);
        (g, display, clock)
    }

    #[test]
    fn bad_code_penalties_escalate_half_clamp_detonate() {
        let (mut g, mut display, mut clock) = armed_game(2, "123456");
        assert_eq!(g.bomb_total_ms, 120_000);

        for (expected_total, strikes) in [(60_000, 1), (15_000, 2), (0, 3)] {
            g.push_code_char('9', &mut display);
            let now = clock.now_ms();
            assert_eq!(
                g.submit_code(now, &mut display, &mut clock),
                Err(Error::BadCode)
            );
            assert_eq!(g.bomb_total_ms, expected_total);
            assert_eq!(g.bad_codes, strikes);
        }

        // Zeroed total detonates on the next tick.
        let mut audio = crate::sim::SimAudio::new();
        let mut siren = Siren::new();
        clock.advance(1);
        g.tick(clock.now_ms(), &mut display, &mut audio, &mut siren);
        assert_eq!(g.phase, DefusalPhase::Exploded);
        assert!(display.row(0).contains("EXPLODED"));
    }

    #[test]
    fn second_bad_code_leaves_short_remainder_alone() {
        let (mut g, mut display, mut clock) = armed_game(1, "7");
        // First strike halves 60 s to 30 s; burn down to under 15 s
        // before the second strike.
        g.push_code_char('0', &mut display);
        let now = clock.now_ms();
        let _ = g.submit_code(now, &mut display, &mut clock);
        assert_eq!(g.bomb_total_ms, 30_000);

        clock.advance(20_000);
        g.push_code_char('0', &mut display);
        let now = clock.now_ms();
        let _ = g.submit_code(now, &mut display, &mut clock);
        // Remaining was under the clamp; total untouched.
        assert_eq!(g.bomb_total_ms, 30_000);
        assert_eq!(g.bad_codes, 2);
    }

    #[test]
    fn correct_code_disarms_and_schedules_end_siren() {
        let (mut g, mut display, mut clock) = armed_game(1, "42");
        clock.advance(5_000);
        for c in "42".chars() {
            g.push_code_char(c, &mut display);
        }
        let now = clock.now_ms();
        g.submit_code(now, &mut display, &mut clock).unwrap();
        assert_eq!(g.phase, DefusalPhase::Disarmed);
        assert!(display.row(0).contains("DISARMED"));

        let mut audio = crate::sim::SimAudio::new();
        let mut siren = Siren::new();
        g.tick(clock.now_ms(), &mut display, &mut audio, &mut siren);
        assert!(!siren.is_active());
        clock.advance(OUTCOME_SIREN_DELAY_MS);
        g.tick(clock.now_ms(), &mut display, &mut audio, &mut siren);
        assert!(siren.is_active());
        assert_eq!(audio.siren_pulses, 1);
    }

    #[test]
    fn code_attempt_wraps_past_six_chars() {
        let mut display = SimDisplay::new();
        let mut g = DefusalGame::start(0, 1, "111111", 0).unwrap();
        for c in "1234567".chars() {
            g.push_code_char(c, &mut display);
        }
        // Seventh character restarted the attempt.
        assert_eq!(g.entered_code(), "7");
        g.clear_entered(&mut display);
        for c in "111111".chars() {
            g.push_code_char(c, &mut display);
        }
        let mut clock = SimClock::new();
        let now = clock.now_ms();
        g.submit_code(now, &mut display, &mut clock).unwrap();
        assert_eq!(g.phase, DefusalPhase::Armed);
    }
}

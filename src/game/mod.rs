//! Game modes and the state they share.
//!
//! Exactly one mode is active at a time; [`GameMode`] makes that a
//! structural fact rather than a set of mutually exclusive flags. A
//! finished mode stays resident (scores or outcome banner on screen)
//! until the operator backs out to the menu.

pub mod defusal;
pub mod domination;
pub mod timer;
pub mod zone;

pub use defusal::DefusalGame;
pub use domination::DominationGame;
pub use timer::TimerGame;
pub use zone::ZoneGame;

use crate::config::{CAPTURE_TONE_HZ, CAPTURE_TONE_MS, TEAM_SWITCH_TIME_MS};
use crate::gesture::{GesturePoll, HoldGesture};
use crate::io::{Audio, Display};

/// The two player teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }
}

/// Minutes entered by the operator, as engine milliseconds.
pub fn minutes_to_ms(minutes: u32) -> u64 {
    u64::from(minutes) * 60_000
}

/// "Delay phase then game phase" sequencing used by Timer and
/// Domination: run out the current duration, then promote the next one.
/// When both durations hit zero the mode has ended.
#[derive(Debug)]
pub struct PhaseTimer {
    pub current_ms: u64,
    pub next_ms: u64,
    pub started_at: u64,
}

/// What one tick of a phase timer observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    Running { remaining_ms: u64 },
    /// The delay phase ran out; the game phase has begun.
    NextPhase,
    /// Both phases ran out; the mode is over.
    Ended,
}

impl PhaseTimer {
    pub fn new(current_ms: u64, next_ms: u64, now: u64) -> Self {
        Self {
            current_ms,
            next_ms,
            started_at: now,
        }
    }

    pub fn step(&mut self, now: u64) -> PhaseStep {
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed >= self.current_ms {
            if self.next_ms == 0 {
                self.current_ms = 0;
                PhaseStep::Ended
            } else {
                self.current_ms = self.next_ms;
                self.next_ms = 0;
                self.started_at = now;
                PhaseStep::NextPhase
            }
        } else {
            PhaseStep::Running {
                remaining_ms: self.current_ms - elapsed,
            }
        }
    }
}

/// Redraw gate: fires at most once per `interval_ms`, measured from
/// time zero for a freshly constructed gate.
#[derive(Debug, Default)]
pub struct Throttle {
    last: u64,
}

impl Throttle {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    pub fn ready(&mut self, now: u64, interval_ms: u64) -> bool {
        if now.saturating_sub(self.last) >= interval_ms {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// The one active game behavior, if any.
#[derive(Debug, Default)]
pub enum GameMode {
    #[default]
    Idle,
    Timer(TimerGame),
    Domination(DominationGame),
    ZoneControl(ZoneGame),
    Defusal(DefusalGame),
}

impl GameMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, GameMode::Idle)
    }

    /// A mode is counting, scoring, or armed - i.e. not idle and not
    /// sitting on a terminal screen. Drives the siren threshold choice
    /// and the short-press `d` exit rule.
    pub fn is_running(&self) -> bool {
        match self {
            GameMode::Idle => false,
            GameMode::Timer(g) => !g.ended,
            GameMode::Domination(g) => !g.ended,
            GameMode::ZoneControl(_) => true,
            GameMode::Defusal(g) => g.is_running(),
        }
    }
}

/// Service the shared capture gesture for Domination and Zone Control:
/// a full hold flips ownership and sounds the confirmation tone, a
/// partial hold shows the progress bar instead of the scores.
pub fn service_capture<D: Display, A: Audio>(
    capture: &mut HoldGesture,
    owner: &mut Option<Team>,
    now: u64,
    team1: bool,
    team2: bool,
    banner: Option<&str>,
    display: &mut D,
    audio: &mut A,
) {
    // The owning team's own button is inert; only the challenger can
    // start a capture.
    let team1 = team1 && *owner != Some(Team::One);
    let team2 = team2 && *owner != Some(Team::Two);

    match capture.poll(now, team1, team2, TEAM_SWITCH_TIME_MS) {
        GesturePoll::Started(_) => {
            display.write_text("", 0, 0, true);
            if let Some(text) = banner {
                display.write_text(text, 0, 0, false);
            }
            display.draw_progress(0, TEAM_SWITCH_TIME_MS as u32);
        }
        GesturePoll::Progress { elapsed_ms, .. } => {
            display.draw_progress(elapsed_ms as u32, TEAM_SWITCH_TIME_MS as u32);
        }
        GesturePoll::Completed(team) => {
            *owner = Some(team);
            audio.beep(CAPTURE_TONE_HZ, CAPTURE_TONE_MS);
        }
        GesturePoll::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_timer_promotes_then_ends() {
        let mut pt = PhaseTimer::new(60_000, 120_000, 0);
        assert_eq!(
            pt.step(59_999),
            PhaseStep::Running { remaining_ms: 1 }
        );
        assert_eq!(pt.step(60_000), PhaseStep::NextPhase);
        assert_eq!(pt.current_ms, 120_000);
        assert_eq!(pt.next_ms, 0);
        assert_eq!(pt.started_at, 60_000);
        assert_eq!(pt.step(180_000), PhaseStep::Ended);
        // Ended leaves both durations at zero.
        assert_eq!(pt.current_ms, 0);
        assert_eq!(pt.next_ms, 0);
    }

    #[test]
    fn throttle_gates_at_interval() {
        let mut t = Throttle::new();
        assert!(!t.ready(0, 1_000));
        assert!(!t.ready(999, 1_000));
        assert!(t.ready(1_000, 1_000));
        assert!(!t.ready(1_500, 1_000));
        assert!(t.ready(2_100, 1_000));
    }

    #[test]
    fn minutes_conversion() {
        assert_eq!(minutes_to_ms(0), 0);
        assert_eq!(minutes_to_ms(1), 60_000);
        assert_eq!(minutes_to_ms(999), 59_940_000);
    }
}

//! Held-button gesture tracking.
//!
//! Capture (Domination / Zone Control) and arm/disarm (button-variant
//! Defusal) are the same physical gesture: hold a team button
//! continuously for a fixed duration. Releasing early aborts with no
//! effect beyond clearing progress. The first button observed held wins;
//! the other is ignored until both are released. A completed gesture
//! latches until both buttons are up, which doubles as the post-arm
//! debounce - a button still physically held after arming cannot
//! immediately start the disarm gesture.

use crate::game::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    InProgress { team: Team, started_at: u64 },
    WaitRelease,
}

/// What one poll of the gesture observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePoll {
    /// Nothing held (or waiting for release).
    Idle,
    /// A hold just began this tick.
    Started(Team),
    /// Hold continuing; `elapsed_ms` since it began.
    Progress { team: Team, elapsed_ms: u64 },
    /// Held to completion; state has latched until both buttons release.
    Completed(Team),
}

#[derive(Debug)]
pub struct HoldGesture {
    state: State,
}

impl HoldGesture {
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Advance the gesture from this tick's button levels.
    pub fn poll(&mut self, now: u64, team1: bool, team2: bool, hold_ms: u64) -> GesturePoll {
        match self.state {
            State::WaitRelease => {
                if !team1 && !team2 {
                    self.state = State::Idle;
                }
                GesturePoll::Idle
            }
            State::Idle => {
                let team = if team1 {
                    Team::One
                } else if team2 {
                    Team::Two
                } else {
                    return GesturePoll::Idle;
                };
                self.state = State::InProgress {
                    team,
                    started_at: now,
                };
                GesturePoll::Started(team)
            }
            State::InProgress { team, started_at } => {
                let held = match team {
                    Team::One => team1,
                    Team::Two => team2,
                };
                if !held {
                    // Released early: abort, progress gone.
                    self.state = State::Idle;
                    return GesturePoll::Idle;
                }
                let elapsed_ms = now.saturating_sub(started_at);
                if elapsed_ms >= hold_ms {
                    self.state = State::WaitRelease;
                    GesturePoll::Completed(team)
                } else {
                    GesturePoll::Progress { team, elapsed_ms }
                }
            }
        }
    }

    /// A hold is currently accruing progress.
    pub fn in_progress(&self) -> bool {
        matches!(self.state, State::InProgress { .. })
    }

}

impl Default for HoldGesture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u64 = 5_000;

    #[test]
    fn completes_at_exact_hold_time() {
        let mut g = HoldGesture::new();
        assert_eq!(g.poll(0, true, false, HOLD), GesturePoll::Started(Team::One));
        assert_eq!(
            g.poll(HOLD - 1, true, false, HOLD),
            GesturePoll::Progress {
                team: Team::One,
                elapsed_ms: HOLD - 1
            }
        );
        assert_eq!(g.poll(HOLD, true, false, HOLD), GesturePoll::Completed(Team::One));
    }

    #[test]
    fn early_release_aborts_without_effect() {
        let mut g = HoldGesture::new();
        g.poll(0, false, true, HOLD);
        g.poll(HOLD - 1, false, true, HOLD);
        assert_eq!(g.poll(HOLD - 1, false, false, HOLD), GesturePoll::Idle);
        // A fresh hold starts from zero.
        assert_eq!(g.poll(HOLD, false, true, HOLD), GesturePoll::Started(Team::Two));
    }

    #[test]
    fn first_button_wins_and_other_is_ignored() {
        let mut g = HoldGesture::new();
        assert_eq!(g.poll(0, true, true, HOLD), GesturePoll::Started(Team::One));
        // Team 2 pressing mid-hold changes nothing.
        assert_eq!(
            g.poll(1_000, true, true, HOLD),
            GesturePoll::Progress {
                team: Team::One,
                elapsed_ms: 1_000
            }
        );
    }

    #[test]
    fn completion_latches_until_both_release() {
        let mut g = HoldGesture::new();
        g.poll(0, true, false, HOLD);
        assert_eq!(g.poll(HOLD, true, false, HOLD), GesturePoll::Completed(Team::One));
        // Still held: no new gesture can start.
        assert_eq!(g.poll(HOLD + 1, true, false, HOLD), GesturePoll::Idle);
        assert_eq!(g.poll(HOLD + 2, false, true, HOLD), GesturePoll::Idle);
        // Both up, then a new hold is accepted.
        assert_eq!(g.poll(HOLD + 3, false, false, HOLD), GesturePoll::Idle);
        assert_eq!(
            g.poll(HOLD + 4, false, true, HOLD),
            GesturePoll::Started(Team::Two)
        );
    }
}

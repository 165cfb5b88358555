//! Zone Control mode: perpetual scoring with no phase timer and no end
//! state of its own - the round runs until the operator force-stops it.
//! The owning team accrues one point per second; the panel alternates
//! between the score lines and the CAPTURING banner while a gesture is
//! in progress.

use crate::config::DISPLAY_REFRESH_MS;
use crate::game::{Team, Throttle};
use crate::gesture::HoldGesture;
use crate::io::Display;
use crate::screen::draw_number;

#[derive(Debug)]
pub struct ZoneGame {
    pub score: [u16; 2],
    pub owner: Option<Team>,
    pub capture: HoldGesture,
    redraw: Throttle,
}

impl ZoneGame {
    /// No operator fields to validate; scoring is live immediately.
    pub fn start(_now: u64) -> Self {
        Self {
            score: [0, 0],
            owner: None,
            capture: HoldGesture::new(),
            redraw: Throttle::new(),
        }
    }

    pub fn tick<D: Display>(&mut self, now: u64, display: &mut D) {
        if self.redraw.ready(now, DISPLAY_REFRESH_MS) {
            if let Some(team) = self.owner {
                // No end state bounds the round; a long-held zone must
                // not wrap the counter.
                self.score[team.index()] = self.score[team.index()].saturating_add(1);
            }
            if !self.capture.in_progress() {
                let banner = match self.owner {
                    None => "  ZONE CONTROL  ",
                    Some(Team::One) => "  TEAM 1 HOLDS  ",
                    Some(Team::Two) => "  TEAM 2 HOLDS  ",
                };
                display.write_text(banner, 0, 0, false);
                display.write_text("T1:      ", 0, 1, false);
                display.write_text("T2:    ", 9, 1, false);
                draw_number(display, self.score[0], 3, 1);
                draw_number(display, self.score[1], 12, 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDisplay;

    #[test]
    fn score_saturates_instead_of_wrapping() {
        let mut game = ZoneGame::start(0);
        game.owner = Some(Team::Two);
        game.score[1] = u16::MAX - 1;
        let mut display = SimDisplay::new();
        for step in 1..=4u64 {
            game.tick(step * DISPLAY_REFRESH_MS, &mut display);
        }
        assert_eq!(game.score[1], u16::MAX);
        assert_eq!(game.score[0], 0);
    }
}

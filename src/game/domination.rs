//! Domination mode: the Timer's two-phase structure plus two-team
//! scoring. Once the game phase opens, whichever team owns the zone
//! accrues one point per second; ownership flips through the held
//! capture gesture serviced by the scheduler. Scores stay on screen
//! after the game ends - the operator reads the winner off the panel.

use crate::config::DISPLAY_REFRESH_MS;
use crate::error::{Error, Field};
use crate::game::{minutes_to_ms, PhaseStep, PhaseTimer, Team, Throttle};
use crate::gesture::HoldGesture;
use crate::io::{Audio, Display};
use crate::screen::{draw_number, draw_time};
use crate::siren::Siren;

#[derive(Debug)]
pub struct DominationGame {
    phase: PhaseTimer,
    /// Game phase open: scoring and capture gestures are live.
    pub scoring: bool,
    pub score: [u16; 2],
    pub owner: Option<Team>,
    pub capture: HoldGesture,
    banner_drawn: bool,
    redraw: Throttle,
    pub ended: bool,
}

impl DominationGame {
    /// Same field validation as Timer; the setup screen is shared.
    pub fn start(delay_min: u32, game_min: u32, now: u64) -> Result<Self, Error> {
        if delay_min == 0 {
            return Err(Error::InvalidInput(Field::DelayMinutes));
        }
        if game_min == 0 {
            return Err(Error::InvalidInput(Field::GameMinutes));
        }
        Ok(Self {
            phase: PhaseTimer::new(minutes_to_ms(delay_min), minutes_to_ms(game_min), now),
            scoring: false,
            score: [0, 0],
            owner: None,
            capture: HoldGesture::new(),
            banner_drawn: false,
            redraw: Throttle::new(),
            ended: false,
        })
    }

    pub fn tick<D: Display, A: Audio>(
        &mut self,
        now: u64,
        display: &mut D,
        audio: &mut A,
        siren: &mut Siren,
    ) {
        if self.ended {
            return;
        }
        match self.phase.step(now) {
            PhaseStep::Ended => {
                self.ended = true;
                display.write_text("DOMINATION ENDED", 0, 0, false);
                siren.start(now, audio);
            }
            PhaseStep::NextPhase => {
                self.scoring = true;
                display.write_text("", 0, 0, true);
                siren.start(now, audio);
            }
            PhaseStep::Running { remaining_ms } => {
                if self.redraw.ready(now, DISPLAY_REFRESH_MS) {
                    if !self.scoring {
                        if !self.banner_drawn {
                            display.write_text("PREP FOR GAME", 1, 0, true);
                            self.banner_drawn = true;
                        }
                        draw_time(display, remaining_ms, 5, 1);
                    } else {
                        if let Some(team) = self.owner {
                            self.score[team.index()] += 1;
                        }
                        display.write_text("TIME LEFT:", 0, 0, false);
                        draw_time(display, remaining_ms, 11, 0);
                        if !self.capture.in_progress() {
                            // Padded labels clear progress-bar leftovers.
                            display.write_text("T1:      ", 0, 1, false);
                            display.write_text("T2:    ", 9, 1, false);
                            draw_number(display, self.score[0], 3, 1);
                            draw_number(display, self.score[1], 12, 1);
                        }
                    }
                }
            }
        }
    }
}

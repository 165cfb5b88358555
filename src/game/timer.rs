//! Timer mode: a prep countdown followed by a game countdown, siren at
//! each boundary. No scoring, no buttons - just the clock.

use crate::config::DISPLAY_REFRESH_MS;
use crate::error::{Error, Field};
use crate::game::{minutes_to_ms, PhaseStep, PhaseTimer, Throttle};
use crate::io::{Audio, Display};
use crate::screen::draw_time;
use crate::siren::Siren;

#[derive(Debug)]
pub struct TimerGame {
    phase: PhaseTimer,
    banner_drawn: bool,
    redraw: Throttle,
    pub ended: bool,
}

impl TimerGame {
    /// Validate the entered minutes and begin the prep phase.
    pub fn start(delay_min: u32, game_min: u32, now: u64) -> Result<Self, Error> {
        if delay_min == 0 {
            return Err(Error::InvalidInput(Field::DelayMinutes));
        }
        if game_min == 0 {
            return Err(Error::InvalidInput(Field::GameMinutes));
        }
        Ok(Self {
            phase: PhaseTimer::new(minutes_to_ms(delay_min), minutes_to_ms(game_min), now),
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
                display.write_text("GAME ENDED", 3, 0, true);
                siren.start(now, audio);
            }
            PhaseStep::NextPhase => {
                display.write_text("GAME STARTED", 2, 0, true);
                self.banner_drawn = true;
                siren.start(now, audio);
            }
            PhaseStep::Running { remaining_ms } => {
                if self.redraw.ready(now, DISPLAY_REFRESH_MS) {
                    if !self.banner_drawn {
                        display.write_text("PREP FOR GAME", 1, 0, true);
                        self.banner_drawn = true;
                    }
                    draw_time(display, remaining_ms, 5, 1);
                }
            }
        }
    }
}

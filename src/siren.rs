//! Siren relay timing.
//!
//! The same level-triggered output serves two signals: a short pulse
//! while a mode is running marks a phase start, a longer one with no
//! mode running marks the end of a game. The scheduler services the
//! auto-stop once per tick.

use crate::config::{SIREN_GAME_END_MS, SIREN_GAME_START_MS};
use crate::io::Audio;

#[derive(Debug, Default)]
pub struct Siren {
    started_at: Option<u64>,
}

impl Siren {
    pub const fn new() -> Self {
        Self { started_at: None }
    }

    /// Raise the siren and note when, for the auto-stop check.
    pub fn start<A: Audio>(&mut self, now: u64, audio: &mut A) {
        self.started_at = Some(now);
        audio.set_siren(true);
    }

    pub fn stop<A: Audio>(&mut self, audio: &mut A) {
        self.started_at = None;
        audio.set_siren(false);
    }

    /// Auto-stop once the threshold for the current game state is
    /// exceeded. Strictly greater-than: at exactly the threshold the
    /// siren is still sounding.
    pub fn service<A: Audio>(&mut self, now: u64, game_running: bool, audio: &mut A) {
        if let Some(started_at) = self.started_at {
            let limit = if game_running {
                SIREN_GAME_START_MS
            } else {
                SIREN_GAME_END_MS
            };
            if now.saturating_sub(started_at) > limit {
                self.stop(audio);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }
}

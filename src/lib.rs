//! Game engine for a 16x2-LCD airsoft bomb prop: four field-game modes
//! (Timer, Domination, Zone Control, Defusal) driven by a 4x4 keypad,
//! two team buttons, a buzzer, and a siren relay, all advanced from one
//! cooperative tick.
//!
//! The engine is written against the traits in [`io`] and [`menu`], so
//! the whole thing runs and tests on the host through the doubles in
//! [`sim`]. The embedded binary in main.rs wires the same engine to the
//! real peripherals and requires the `embedded` feature.
//!
//! Usage: `cargo test` on the host; `cargo build --features embedded
//! --target thumbv7em-none-eabihf` for the device.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod gesture;
pub mod input;
pub mod io;
pub mod menu;
pub mod screen;
pub mod sim;
pub mod siren;

pub use controller::Controller;
pub use error::Error;
pub use game::GameMode;

#[cfg(test)]
mod tests {
    use crate::config::{
        KEYPAD_LONG_PRESS_MS, SIREN_GAME_END_MS, SIREN_GAME_START_MS, SPLASH_DWELL_MS,
    };
    use crate::game::GameMode;
    use crate::input::{EntryBuffer, Key};
    use crate::io::Clock;
    use crate::menu::{MenuNav, Screen};
    use crate::sim::{ScriptedKeypad, SimAudio, SimButtons, SimClock, SimDisplay, SimMenu};
    use crate::siren::Siren;
    use crate::Controller;

    type BenchController =
        Controller<SimClock, ScriptedKeypad, SimDisplay, SimAudio, SimButtons, SimMenu>;

    fn bench() -> BenchController {
        Controller::new(
            SimClock::new(),
            ScriptedKeypad::new(),
            SimDisplay::new(),
            SimAudio::new(),
            SimButtons::new(),
            SimMenu::new(),
        )
    }

    /// Run `n` ticks, one queued key event consumed per tick.
    fn ticks(ctl: &mut BenchController, n: usize) {
        for _ in 0..n {
            ctl.tick();
            ctl.clock.advance(5);
        }
    }

    #[test]
    fn splash_dwells_then_lands_on_main_menu() {
        let ctl = bench();
        assert!(ctl.clock.now_ms() >= u64::from(SPLASH_DWELL_MS));
        assert_eq!(ctl.menu.current_screen(), Screen::Main);
        assert!(ctl.mode.is_idle());
        assert_eq!(ctl.menu.focused_line(), 0);
    }

    #[test]
    fn entry_buffer_wraps_and_restarts() {
        let mut buf: EntryBuffer<3> = EntryBuffer::new();
        for c in "123".chars() {
            buf.push(c);
        }
        assert_eq!(buf.as_str(), "123");
        assert_eq!(buf.minutes(), 123);
        // Fourth digit restarts the entry.
        buf.push('4');
        assert_eq!(buf.as_str(), "4");

        // Refocusing keeps the value readable until the next keypress.
        buf.mark_restart();
        assert_eq!(buf.as_str(), "4");
        buf.push('7');
        assert_eq!(buf.as_str(), "7");

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.minutes(), 0);
    }

    #[test]
    fn siren_pulse_lengths_depend_on_game_state() {
        let mut audio = SimAudio::new();
        let mut siren = Siren::new();

        siren.start(0, &mut audio);
        siren.service(SIREN_GAME_START_MS, true, &mut audio);
        assert!(audio.siren_on, "still on at exactly the threshold");
        siren.service(SIREN_GAME_START_MS + 1, true, &mut audio);
        assert!(!audio.siren_on);

        siren.start(0, &mut audio);
        siren.service(SIREN_GAME_START_MS + 1, false, &mut audio);
        assert!(audio.siren_on, "end-of-game pulse runs longer");
        siren.service(SIREN_GAME_END_MS + 1, false, &mut audio);
        assert!(!audio.siren_on);
        assert_eq!(audio.siren_pulses, 2);
    }

    #[test]
    fn zone_control_starts_straight_from_the_menu() {
        let mut ctl = bench();
        for _ in 0..3 {
            ctl.keypad.press(Key::FocusNext);
        }
        ctl.keypad.press(Key::Select);
        ticks(&mut ctl, 4);
        assert!(matches!(ctl.mode, GameMode::ZoneControl(_)));
        assert!(ctl.mode.is_running());
    }

    #[test]
    fn navigation_is_frozen_while_a_mode_runs() {
        let mut ctl = bench();
        for _ in 0..3 {
            ctl.keypad.press(Key::FocusNext);
        }
        ctl.keypad.press(Key::Select);
        ticks(&mut ctl, 4);

        let line = ctl.menu.focused_line();
        ctl.keypad.press(Key::FocusNext);
        ctl.keypad.press(Key::Select);
        ticks(&mut ctl, 2);
        assert_eq!(ctl.menu.focused_line(), line);
        assert!(matches!(ctl.mode, GameMode::ZoneControl(_)));
    }

    #[test]
    fn short_back_press_cannot_stop_a_running_game() {
        let mut ctl = bench();
        for _ in 0..3 {
            ctl.keypad.press(Key::FocusNext);
        }
        ctl.keypad.press(Key::Select);
        ticks(&mut ctl, 4);

        ctl.keypad.press(Key::Back);
        ticks(&mut ctl, 1);
        assert!(matches!(ctl.mode, GameMode::ZoneControl(_)));
    }

    #[test]
    fn long_back_press_force_stops_any_mode() {
        let mut ctl = bench();
        for _ in 0..3 {
            ctl.keypad.press(Key::FocusNext);
        }
        ctl.keypad.press(Key::Select);
        ticks(&mut ctl, 4);
        assert!(!ctl.mode.is_idle());

        // The keypad driver reports the hold after the long-press time.
        ctl.clock.advance(u64::from(KEYPAD_LONG_PRESS_MS));
        ctl.keypad.hold(Key::Back);
        ticks(&mut ctl, 1);
        assert!(ctl.mode.is_idle());
        assert_eq!(ctl.menu.current_screen(), Screen::Main);
        assert!(!ctl.audio.siren_on);
    }

    #[test]
    fn every_keypress_sounds_a_tone() {
        let mut ctl = bench();
        let before = ctl.audio.beep_count;
        ctl.keypad.press(Key::Digit(5));
        ctl.keypad.press(Key::Select);
        ctl.keypad.press(Key::Back);
        ticks(&mut ctl, 3);
        assert_eq!(ctl.audio.beep_count, before + 3);
    }
}

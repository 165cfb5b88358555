//! Top-level device controller: owns the collaborators, the menu/setup
//! state, and whichever game mode is active, and advances everything
//! from a single cooperative [`Controller::tick`].
//!
//! A tick is: drain one keypad event, service the siren auto-stop,
//! poll the team buttons for modes that use a hold gesture, then
//! advance the active mode. Nothing here blocks except the deliberate
//! UI dwells routed through [`Clock::pause_ms`].

use crate::config::{
    INVALID_INPUT_DWELL_MS, KEY_TONE_BACK_HZ, KEY_TONE_CONFIRM_HZ, KEY_TONE_GENERIC_HZ,
    KEY_TONE_MS, SPLASH_DWELL_MS,
};
use crate::error::{Error, Field};
use crate::game::defusal::DefusalPhase;
use crate::game::{
    service_capture, DefusalGame, DominationGame, GameMode, TimerGame, ZoneGame,
};
use crate::input::{Key, KeyEvent, KeyKind, SetupFields};
use crate::io::{Audio, Clock, Display, Keypad, TeamButtons};
use crate::menu::{MenuEvent, MenuNav, Screen};
use crate::siren::Siren;

/// Which mode the shared setup screen is collecting fields for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupTarget {
    Timer,
    Domination,
    Defusal,
}

pub struct Controller<C, K, D, A, B, M> {
    pub clock: C,
    pub keypad: K,
    pub display: D,
    pub audio: A,
    pub buttons: B,
    pub menu: M,
    pub fields: SetupFields,
    pub mode: GameMode,
    pub siren: Siren,
    pending: Option<SetupTarget>,
}

impl<C, K, D, A, B, M> Controller<C, K, D, A, B, M>
where
    C: Clock,
    K: Keypad,
    D: Display,
    A: Audio,
    B: TeamButtons,
    M: MenuNav,
{
    /// Build the controller, show the splash banner for its dwell, and
    /// land on the main menu.
    pub fn new(clock: C, keypad: K, display: D, audio: A, buttons: B, menu: M) -> Self {
        let mut ctl = Self {
            clock,
            keypad,
            display,
            audio,
            buttons,
            menu,
            fields: SetupFields::new(),
            mode: GameMode::Idle,
            siren: Siren::new(),
            pending: None,
        };
        ctl.display.write_text("T-BAG BOMB", 3, 0, true);
        ctl.display.write_text("9v.lt v", 3, 1, false);
        ctl.display.write_text(env!("CARGO_PKG_VERSION"), 10, 1, false);
        ctl.clock.pause_ms(SPLASH_DWELL_MS);
        ctl.menu.open(Screen::Main);
        ctl.menu.refresh(&ctl.fields);
        ctl
    }

    /// One pass of the cooperative loop.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        if let Some(event) = self.keypad.poll() {
            self.dispatch_key(event, now);
        }

        // Key handling may have dwelled; everything below gets a fresh
        // reading.
        let now = self.clock.now_ms();
        self.siren.service(now, self.mode.is_running(), &mut self.audio);

        let team1 = self.buttons.team1_held();
        let team2 = self.buttons.team2_held();
        match &mut self.mode {
            GameMode::Domination(g) if g.scoring && !g.ended => {
                service_capture(
                    &mut g.capture,
                    &mut g.owner,
                    now,
                    team1,
                    team2,
                    None,
                    &mut self.display,
                    &mut self.audio,
                );
            }
            GameMode::ZoneControl(g) => {
                service_capture(
                    &mut g.capture,
                    &mut g.owner,
                    now,
                    team1,
                    team2,
                    Some("   CAPTURING    "),
                    &mut self.display,
                    &mut self.audio,
                );
            }
            GameMode::Defusal(g)
                if !g.use_code
                    && matches!(g.phase, DefusalPhase::Ready | DefusalPhase::Armed) =>
            {
                g.service_buttons(
                    now,
                    team1,
                    team2,
                    &mut self.display,
                    &mut self.audio,
                    &mut self.clock,
                );
            }
            _ => {}
        }

        match &mut self.mode {
            GameMode::Idle => {}
            GameMode::Timer(g) => g.tick(now, &mut self.display, &mut self.audio, &mut self.siren),
            GameMode::Domination(g) => {
                g.tick(now, &mut self.display, &mut self.audio, &mut self.siren)
            }
            GameMode::ZoneControl(g) => g.tick(now, &mut self.display),
            GameMode::Defusal(g) => {
                g.tick(now, &mut self.display, &mut self.audio, &mut self.siren)
            }
        }
    }

    fn dispatch_key(&mut self, event: KeyEvent, now: u64) {
        if event.kind == KeyKind::Hold {
            // Long-press back is the force stop; everything else has no
            // hold meaning. Guarded to long-press so a brushed key
            // cannot kill a running game.
            if event.key == Key::Back && !self.mode.is_idle() {
                self.exit_to_menu();
            }
            return;
        }

        self.key_tone(event.key);
        match event.key {
            Key::FocusPrev => {
                if self.mode.is_idle() {
                    self.menu.focus_prev();
                    self.fields.mark_restart_all();
                }
            }
            Key::FocusNext => {
                if self.mode.is_idle() {
                    self.menu.focus_next();
                    self.fields.mark_restart_all();
                }
            }
            Key::Select => {
                if self.mode.is_idle() {
                    self.siren.stop(&mut self.audio);
                    if let Some(menu_event) = self.menu.select() {
                        self.handle_menu_event(menu_event, now);
                    }
                }
            }
            Key::Back => {
                // Short-press back leaves the menu tree or a finished
                // game; a running game only yields to the long press.
                if !self.mode.is_running() {
                    self.exit_to_menu();
                }
            }
            Key::Star => {
                if let GameMode::Defusal(g) = &mut self.mode {
                    if g.code_entry_live() {
                        g.clear_entered(&mut self.display);
                    }
                }
            }
            Key::Hash => {
                if let GameMode::Defusal(g) = &mut self.mode {
                    if g.code_entry_live() {
                        // Bad codes report on the panel and apply their
                        // penalty inside; nothing further to do here.
                        let _ = g.submit_code(now, &mut self.display, &mut self.clock);
                    }
                }
            }
            Key::Digit(_) => {
                if let Some(c) = event.key.as_char() {
                    match &mut self.mode {
                        GameMode::Idle => {
                            let screen = self.menu.current_screen();
                            let line = self.menu.focused_line();
                            self.fields.push(screen, line, c);
                        }
                        GameMode::Defusal(g) if g.code_entry_live() => {
                            g.push_code_char(c, &mut self.display);
                        }
                        _ => {}
                    }
                }
            }
        }

        if self.mode.is_idle() {
            self.menu.refresh(&self.fields);
        }
    }

    fn key_tone(&mut self, key: Key) {
        let hz = match key {
            Key::Select => KEY_TONE_CONFIRM_HZ,
            Key::Back => KEY_TONE_BACK_HZ,
            _ => KEY_TONE_GENERIC_HZ,
        };
        self.audio.beep(hz, KEY_TONE_MS);
    }

    fn handle_menu_event(&mut self, event: MenuEvent, now: u64) {
        match event {
            MenuEvent::OpenTimer => self.open_setup(SetupTarget::Timer, Screen::TimerSetup),
            MenuEvent::OpenDomination => {
                self.open_setup(SetupTarget::Domination, Screen::TimerSetup)
            }
            MenuEvent::OpenDefusal => self.open_setup(SetupTarget::Defusal, Screen::DefusalSetup),
            MenuEvent::OpenZoneControl => {
                // No setup fields; scoring is live immediately.
                self.pending = None;
                self.display.write_text("", 0, 0, true);
                self.mode = GameMode::ZoneControl(ZoneGame::start(now));
            }
            MenuEvent::EditLine(line) => {
                let screen = self.menu.current_screen();
                self.fields.clear_line(screen, line);
            }
            MenuEvent::Start => self.try_start(),
        }
    }

    fn open_setup(&mut self, target: SetupTarget, screen: Screen) {
        self.pending = Some(target);
        self.fields.clear_all();
        self.menu.open(screen);
    }

    fn try_start(&mut self) {
        let started = match self.pending {
            Some(SetupTarget::Timer) => TimerGame::start(
                self.fields.delay.minutes(),
                self.fields.game.minutes(),
                self.clock.now_ms(),
            )
            .map(GameMode::Timer),
            Some(SetupTarget::Domination) => DominationGame::start(
                self.fields.delay.minutes(),
                self.fields.game.minutes(),
                self.clock.now_ms(),
            )
            .map(GameMode::Domination),
            Some(SetupTarget::Defusal) => DefusalGame::start(
                self.fields.delay.minutes(),
                self.fields.bomb.minutes(),
                self.fields.code.as_str(),
                self.clock.now_ms(),
            )
            .map(GameMode::Defusal),
            None => return,
        };
        match started {
            Ok(mode) => {
                self.display.write_text("", 0, 0, true);
                self.mode = mode;
            }
            Err(Error::InvalidInput(field)) => self.report_invalid(field),
            Err(_) => {}
        }
    }

    /// Name the bad field on the panel, dwell, then hand focus back to
    /// its line with the field wiped for re-entry.
    fn report_invalid(&mut self, field: Field) {
        self.display.write_text("*INVALID INPUT*", 0, 0, true);
        self.display.write_text(field.banner(), 1, 1, false);
        self.clock.pause_ms(INVALID_INPUT_DWELL_MS);
        let screen = self.menu.current_screen();
        self.fields.clear_line(screen, field.line());
        self.menu.set_focus(field.line());
        self.menu.refresh(&self.fields);
    }

    /// Stop whatever is happening and land on the main menu.
    fn exit_to_menu(&mut self) {
        self.mode = GameMode::Idle;
        self.pending = None;
        self.siren.stop(&mut self.audio);
        self.fields.clear_all();
        self.display.write_text("", 0, 0, true);
        self.menu.open(Screen::Main);
        self.menu.refresh(&self.fields);
    }
}

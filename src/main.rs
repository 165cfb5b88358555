//! Embedded entry point: nRF52840 + HD44780 LCD + 4x4 matrix keypad +
//! buzzer PWM + siren relay + two team buttons, running the engine from
//! [`bombprop::Controller`] on a 5 ms cooperative tick.
//!
//! Build with `--features embedded --target thumbv7em-none-eabihf`.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::SimplePwm;
use embassy_time::{block_for, Duration, Instant, Timer};
use hd44780_driver::HD44780;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use bombprop::config::{KEYPAD_LONG_PRESS_MS, LCD_COLS};
use bombprop::input::{Key, KeyEvent, KeyKind, SetupFields};
use bombprop::io::{Audio, Clock, Display, Keypad, TeamButtons};
use bombprop::menu::{MenuEvent, MenuNav, Screen};
use bombprop::Controller;

// The LCD is shared by the Display adapter and the menu renderer; both
// run on the same executor thread, so a RefCell is enough.
type Lcd = HD44780<
    hd44780_driver::bus::FourBitBus<
        Output<'static>,
        Output<'static>,
        Output<'static>,
        Output<'static>,
        Output<'static>,
        Output<'static>,
    >,
>;

struct SharedLcd {
    lcd: RefCell<Lcd>,
    delay: RefCell<embassy_time::Delay>,
}

impl SharedLcd {
    fn clear(&self) {
        let mut delay = self.delay.borrow_mut();
        let _ = self.lcd.borrow_mut().clear(&mut *delay);
    }

    fn print(&self, text: &str, col: u8, row: u8) {
        let mut delay = self.delay.borrow_mut();
        let mut lcd = self.lcd.borrow_mut();
        // DDRAM row stride on the 16x2 panel.
        let _ = lcd.set_cursor_pos(col + row * 0x40, &mut *delay);
        let _ = lcd.write_str(text, &mut *delay);
    }
}

/// Uptime clock; pauses block the executor thread on purpose (UI
/// dwells stall the whole tick, matching the engine's assumptions).
struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn pause_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}

/// 4x4 matrix scan with per-key press/hold tracking. Rows are driven
/// low one at a time; columns idle high through pull-ups.
struct MatrixKeypad {
    rows: [Output<'static>; 4],
    cols: [Input<'static>; 4],
    pressed: Option<(Key, u64)>,
    hold_sent: bool,
}

const KEYMAP: [[Key; 4]; 4] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::FocusPrev],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::FocusNext],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::Select],
    [Key::Star, Key::Digit(0), Key::Hash, Key::Back],
];

impl MatrixKeypad {
    fn new(rows: [Output<'static>; 4], cols: [Input<'static>; 4]) -> Self {
        Self {
            rows,
            cols,
            pressed: None,
            hold_sent: false,
        }
    }

    fn scan(&mut self) -> Option<Key> {
        let mut hit = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low();
            // Let the line settle before sampling.
            cortex_m::asm::delay(64);
            for (c, col) in self.cols.iter().enumerate() {
                if col.is_low() {
                    hit = Some(KEYMAP[r][c]);
                }
            }
            row.set_high();
            if hit.is_some() {
                break;
            }
        }
        hit
    }
}

impl Keypad for MatrixKeypad {
    fn poll(&mut self) -> Option<KeyEvent> {
        let now = Instant::now().as_millis();
        let current = self.scan();
        match (self.pressed, current) {
            (None, Some(key)) => {
                self.pressed = Some((key, now));
                self.hold_sent = false;
                Some(KeyEvent {
                    key,
                    kind: KeyKind::Press,
                })
            }
            (Some((key, since)), Some(held)) if held == key => {
                if !self.hold_sent && now.saturating_sub(since) >= u64::from(KEYPAD_LONG_PRESS_MS)
                {
                    self.hold_sent = true;
                    Some(KeyEvent {
                        key,
                        kind: KeyKind::Hold,
                    })
                } else {
                    None
                }
            }
            (Some(_), other) => {
                // Released, or bounced onto another key; re-arm.
                self.pressed = other.map(|k| (k, now));
                self.hold_sent = false;
                None
            }
            (None, None) => None,
        }
    }
}

/// Display adapter: text through the shared LCD, progress as a
/// full-width bar of filled cells on the bottom row.
struct LcdPanel {
    lcd: &'static SharedLcd,
}

impl Display for LcdPanel {
    fn write_text(&mut self, text: &str, col: u8, row: u8, clear_first: bool) {
        if clear_first {
            self.lcd.clear();
        }
        self.lcd.print(text, col, row);
    }

    fn draw_progress(&mut self, value: u32, max: u32) {
        let filled = if max == 0 {
            0
        } else {
            (value.min(max) * u32::from(LCD_COLS)) / max
        };
        let mut bar = heapless::String::<16>::new();
        for i in 0..LCD_COLS {
            let _ = bar.push(if u32::from(i) < filled { '\u{ff}' } else { ' ' });
        }
        self.lcd.print(bar.as_str(), 0, 1);
    }
}

/// Buzzer on one PWM channel plus the siren relay pin. Tones are
/// non-blocking; the main loop calls [`BuzzerAudio::service`] each tick
/// to silence an expired one.
struct BuzzerAudio {
    pwm: SimplePwm<'static, PWM0>,
    siren: Output<'static>,
    tone_off_at: Option<Instant>,
}

impl BuzzerAudio {
    fn new(pwm: SimplePwm<'static, PWM0>, siren: Output<'static>) -> Self {
        Self {
            pwm,
            siren,
            tone_off_at: None,
        }
    }

    fn service(&mut self) {
        if let Some(off_at) = self.tone_off_at {
            if Instant::now() >= off_at {
                self.pwm.disable();
                self.tone_off_at = None;
            }
        }
    }
}

impl Audio for BuzzerAudio {
    fn beep(&mut self, freq_hz: u16, duration_ms: u32) {
        if freq_hz == 0 {
            return;
        }
        // 1 MHz base clock; period counts give the requested pitch at
        // 50% duty.
        let period = (1_000_000u32 / u32::from(freq_hz)) as u16;
        self.pwm.set_period(u32::from(freq_hz));
        self.pwm.set_duty(0, period / 2);
        self.pwm.enable();
        self.tone_off_at = Some(Instant::now() + Duration::from_millis(u64::from(duration_ms)));
    }

    fn set_siren(&mut self, on: bool) {
        if on {
            self.siren.set_high();
        } else {
            self.siren.set_low();
        }
    }
}

/// Active-low team buttons.
struct TeamInputs {
    team1: Input<'static>,
    team2: Input<'static>,
}

impl TeamButtons for TeamInputs {
    fn team1_held(&mut self) -> bool {
        self.team1.is_low()
    }

    fn team2_held(&mut self) -> bool {
        self.team2.is_low()
    }
}

/// LCD-backed menu: a two-row window over the current screen's lines,
/// focused line marked with `>`. Field lines render their live value
/// straight from the entry buffers.
struct LcdMenu {
    lcd: &'static SharedLcd,
    screen: Screen,
    focus: usize,
}

impl LcdMenu {
    fn new(lcd: &'static SharedLcd) -> Self {
        Self {
            lcd,
            screen: Screen::Main,
            focus: 0,
        }
    }

    fn line_count(&self) -> usize {
        match self.screen {
            Screen::Main => 4,
            Screen::TimerSetup => 3,
            Screen::DefusalSetup => 4,
        }
    }

    fn line_text(&self, line: usize, fields: &SetupFields, out: &mut heapless::String<16>) {
        use core::fmt::Write;
        match (self.screen, line) {
            (Screen::Main, 0) => {
                let _ = out.push_str("Defusal");
            }
            (Screen::Main, 1) => {
                let _ = out.push_str("Domination");
            }
            (Screen::Main, 2) => {
                let _ = out.push_str("Timer");
            }
            (Screen::Main, 3) => {
                let _ = out.push_str("Zone Control");
            }
            (Screen::TimerSetup, 0) | (Screen::DefusalSetup, 0) => {
                let _ = write!(out, "Delay min: {}", fields.delay.as_str());
            }
            (Screen::TimerSetup, 1) => {
                let _ = write!(out, "Game  min: {}", fields.game.as_str());
            }
            (Screen::DefusalSetup, 1) => {
                let _ = write!(out, "Bomb  min: {}", fields.bomb.as_str());
            }
            (Screen::DefusalSetup, 2) => {
                let _ = write!(out, "Code: {}", fields.code.as_str());
            }
            (Screen::TimerSetup, 2) | (Screen::DefusalSetup, 3) => {
                let _ = out.push_str("START");
            }
            _ => {}
        }
    }
}

impl MenuNav for LcdMenu {
    fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn focus_next(&mut self) {
        if self.focus + 1 < self.line_count() {
            self.focus += 1;
        }
    }

    fn select(&mut self) -> Option<MenuEvent> {
        match (self.screen, self.focus) {
            (Screen::Main, 0) => Some(MenuEvent::OpenDefusal),
            (Screen::Main, 1) => Some(MenuEvent::OpenDomination),
            (Screen::Main, 2) => Some(MenuEvent::OpenTimer),
            (Screen::Main, 3) => Some(MenuEvent::OpenZoneControl),
            (Screen::TimerSetup, line @ 0..=1) => Some(MenuEvent::EditLine(line)),
            (Screen::TimerSetup, 2) => Some(MenuEvent::Start),
            (Screen::DefusalSetup, line @ 0..=2) => Some(MenuEvent::EditLine(line)),
            (Screen::DefusalSetup, 3) => Some(MenuEvent::Start),
            _ => None,
        }
    }

    fn open(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = 0;
    }

    fn set_focus(&mut self, line: usize) {
        self.focus = line.min(self.line_count() - 1);
    }

    fn focused_line(&self) -> usize {
        self.focus
    }

    fn current_screen(&self) -> Screen {
        self.screen
    }

    fn refresh(&mut self, fields: &SetupFields) {
        self.lcd.clear();
        // Keep the focused line visible in the two-row window.
        let top = self.focus.min(self.line_count().saturating_sub(2));
        for row in 0..2 {
            let line = top + row;
            if line >= self.line_count() {
                break;
            }
            let mut text = heapless::String::<16>::new();
            self.line_text(line, fields, &mut text);
            let marker = if line == self.focus { ">" } else { " " };
            self.lcd.print(marker, 0, row as u8);
            self.lcd.print(text.as_str(), 1, row as u8);
        }
    }
}

static LCD: StaticCell<SharedLcd> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("bombprop starting");

    let drive = OutputDrive::Standard;
    let rs = Output::new(p.P0_03, Level::Low, drive);
    let en = Output::new(p.P0_04, Level::Low, drive);
    let d4 = Output::new(p.P0_28, Level::Low, drive);
    let d5 = Output::new(p.P0_29, Level::Low, drive);
    let d6 = Output::new(p.P0_30, Level::Low, drive);
    let d7 = Output::new(p.P0_31, Level::Low, drive);

    let mut delay = embassy_time::Delay;
    let lcd = match HD44780::new_4bit(rs, en, d4, d5, d6, d7, &mut delay) {
        Ok(lcd) => lcd,
        Err(_) => {
            defmt::panic!("LCD init failed");
        }
    };
    let lcd = LCD.init(SharedLcd {
        lcd: RefCell::new(lcd),
        delay: RefCell::new(embassy_time::Delay),
    });

    let rows = [
        Output::new(p.P0_11, Level::High, drive),
        Output::new(p.P0_12, Level::High, drive),
        Output::new(p.P0_13, Level::High, drive),
        Output::new(p.P0_14, Level::High, drive),
    ];
    let cols = [
        Input::new(p.P0_15, Pull::Up),
        Input::new(p.P0_16, Pull::Up),
        Input::new(p.P0_17, Pull::Up),
        Input::new(p.P0_18, Pull::Up),
    ];
    let keypad = MatrixKeypad::new(rows, cols);

    let pwm = SimplePwm::new_1ch(p.PWM0, p.P0_02);
    let siren = Output::new(p.P0_26, Level::Low, drive);
    let audio = BuzzerAudio::new(pwm, siren);

    let buttons = TeamInputs {
        team1: Input::new(p.P0_24, Pull::Up),
        team2: Input::new(p.P0_25, Pull::Up),
    };

    let menu = LcdMenu::new(lcd);
    let panel = LcdPanel { lcd };

    let mut ctl = Controller::new(UptimeClock, keypad, panel, audio, buttons, menu);
    info!("entering tick loop");

    loop {
        ctl.tick();
        ctl.audio.service();
        Timer::after_millis(5).await;
    }
}

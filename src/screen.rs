//! Text formatting helpers for the 16x2 panel.

use core::fmt::Write;

use heapless::String;

use crate::io::Display;

/// Format milliseconds as zero-padded `MM:SS`. Two trailing spaces
/// clear leftovers when the minute count shrinks a digit.
pub fn format_mmss(ms: u64) -> String<12> {
    let total_secs = ms / 1_000;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    let mut out = String::new();
    let _ = write!(out, "{:02}:{:02}  ", mins, secs);
    out
}

/// Render a countdown at (col, row).
pub fn draw_time<D: Display>(display: &mut D, ms: u64, col: u8, row: u8) {
    display.write_text(format_mmss(ms).as_str(), col, row, false);
}

/// Render a score number at (col, row).
pub fn draw_number<D: Display>(display: &mut D, value: u16, col: u8, row: u8) {
    let mut out: String<8> = String::new();
    let _ = write!(out, "{}", value);
    display.write_text(out.as_str(), col, row, false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmss_pads_and_trails_spaces() {
        assert_eq!(format_mmss(0).as_str(), "00:00  ");
        assert_eq!(format_mmss(59_999).as_str(), "00:59  ");
        assert_eq!(format_mmss(60_000).as_str(), "01:00  ");
        assert_eq!(format_mmss(99 * 60_000 + 5_000).as_str(), "99:05  ");
    }

    #[test]
    fn mmss_handles_three_digit_minutes() {
        assert_eq!(format_mmss(999 * 60_000).as_str(), "999:00  ");
    }
}

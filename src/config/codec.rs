//! Text encoding of [`Settings`].
//!
//! The format is one `key=value` pair per line. Blank lines, `#` comments,
//! lines without `=` and unknown keys are skipped. Integer values are parsed
//! leniently: leading whitespace, an optional sign and the leading run of
//! digits are used, anything else yields `0`.

use super::{Rgb, Settings};
use std::fmt::Write;
use tracing::debug;

const GRID_SIZE: &str = "gridSize";
const WINDOW_WIDTH: &str = "windowWidth";
const WINDOW_HEIGHT: &str = "windowHeight";
const BG_COLOR: &str = "bgColor";
const GRID_COLOR: &str = "gridColor";

/// Render settings in the fixed key order.
pub fn encode(settings: &Settings) -> String {
    let mut text = String::with_capacity(96);
    // Writing into a String cannot fail.
    let _ = writeln!(text, "{}={}", GRID_SIZE, settings.grid_size);
    let _ = writeln!(text, "{}={}", WINDOW_WIDTH, settings.window_width);
    let _ = writeln!(text, "{}={}", WINDOW_HEIGHT, settings.window_height);
    let _ = writeln!(text, "{}={}", BG_COLOR, settings.background_color);
    let _ = writeln!(text, "{}={}", GRID_COLOR, settings.grid_color);
    text
}

/// Decode text on top of the default settings.
pub fn decode(text: &str) -> Settings {
    decode_into(Settings::default(), text)
}

/// Decode text on top of `settings`; fields not mentioned keep their value.
///
/// `grid_size` is clamped on return whether or not the text set it.
pub fn decode_into(mut settings: Settings, text: &str) -> Settings {
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            debug!("config line {}: no '=', skipped", line_no + 1);
            continue;
        };

        match key {
            GRID_SIZE => settings.grid_size = parse_int_lenient(value),
            WINDOW_WIDTH => settings.window_width = parse_int_lenient(value),
            WINDOW_HEIGHT => settings.window_height = parse_int_lenient(value),
            BG_COLOR => match parse_color(value) {
                Some(color) => settings.background_color = color,
                None => debug!("config line {}: malformed {}, kept previous", line_no + 1, key),
            },
            GRID_COLOR => match parse_color(value) {
                Some(color) => settings.grid_color = color,
                None => debug!("config line {}: malformed {}, kept previous", line_no + 1, key),
            },
            _ => debug!("config line {}: unknown key {:?}, skipped", line_no + 1, key),
        }
    }

    settings.clamp_grid_size();
    settings
}

/// `atoi`-style parse. Never fails; saturates on overflow.
pub fn parse_int_lenient(value: &str) -> i32 {
    parse_leading_int(value).unwrap_or(0)
}

/// Leading integer of `value`, or `None` when no digit follows the sign.
fn parse_leading_int(value: &str) -> Option<i32> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut seen_digit = false;
    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        acc = (acc * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if !seen_digit {
        return None;
    }

    let signed = if negative { -acc } else { acc };
    Some(signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Three whitespace-separated integers `R G B`. Channels keep their low byte.
fn parse_color(value: &str) -> Option<Rgb> {
    let mut parts = value.split_whitespace();
    let mut channel = || parts.next().and_then(parse_leading_int).map(|v| v as u8);
    let r = channel()?;
    let g = channel()?;
    let b = channel()?;
    Some(Rgb::new(r, g, b))
}

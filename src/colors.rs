//! # Colors Module
//!
//! Color names as stored in settings (`cyan`, `brightBlue`, `bgRed`,
//! `ansi256:208`, `hex:FF8800`) and their ANSI rendering.
//!
//! `color_level` selects what reaches the terminal: 0 plain text, 1 basic
//! 16 colors, 2 adds the 256-color palette (hex colors are mapped onto it),
//! 3 truecolor. Building without the `colors` feature always yields plain text.

use std::env;

#[cfg(feature = "colors")]
use owo_colors::{AnsiColors, DynColors, OwoColorize, Style, XtermColors};

/// Backgrounds handed out to powerline segments, in assignment order
pub const POWERLINE_PALETTE: [&str; 14] = [
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "brightBlack",
    "brightRed",
    "brightGreen",
    "brightYellow",
    "brightBlue",
    "brightMagenta",
    "brightCyan",
];

const BASIC_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "brightblack",
    "brightred",
    "brightgreen",
    "brightyellow",
    "brightblue",
    "brightmagenta",
    "brightcyan",
    "brightwhite",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// One of the 16 basic terminal colors
    Basic(u8),
    Xterm(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a stored color name. A leading `bg` (as in `bgBlue`) is ignored.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(n) = name.strip_prefix("ansi256:") {
            return n.trim().parse().ok().map(Self::Xterm);
        }
        if let Some(hex) = name.strip_prefix("hex:").or_else(|| name.strip_prefix('#')) {
            return parse_hex(hex);
        }
        let lower = name.to_ascii_lowercase();
        let lower = match lower.strip_prefix("bg") {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => lower,
        };
        let lower = if lower == "gray" || lower == "grey" {
            "brightblack".to_string()
        } else {
            lower
        };
        BASIC_NAMES
            .iter()
            .position(|n| *n == lower)
            .map(|i| Self::Basic(i as u8))
    }

    /// The color as it can be shown at `level`, if at all
    pub fn at_level(self, level: u8) -> Option<Self> {
        match (self, level) {
            (_, 0) => None,
            (Self::Basic(_), _) => Some(self),
            (_, 1) => None,
            (Self::Xterm(_), _) => Some(self),
            (Self::Rgb(r, g, b), 2) => Some(Self::Xterm(rgb_to_xterm(r, g, b))),
            (Self::Rgb(..), _) => Some(self),
        }
    }

    #[cfg(feature = "colors")]
    fn to_dyn(self) -> DynColors {
        match self {
            Self::Basic(i) => DynColors::Ansi(basic_ansi(i)),
            Self::Xterm(n) => DynColors::Xterm(XtermColors::from(n)),
            Self::Rgb(r, g, b) => DynColors::Rgb(r, g, b),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Nearest entry of the 6x6x6 xterm color cube
fn rgb_to_xterm(r: u8, g: u8, b: u8) -> u8 {
    let scale = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * scale(r) + 6 * scale(g) + scale(b)
}

#[cfg(feature = "colors")]
fn basic_ansi(i: u8) -> AnsiColors {
    match i {
        0 => AnsiColors::Black,
        1 => AnsiColors::Red,
        2 => AnsiColors::Green,
        3 => AnsiColors::Yellow,
        4 => AnsiColors::Blue,
        5 => AnsiColors::Magenta,
        6 => AnsiColors::Cyan,
        7 => AnsiColors::White,
        8 => AnsiColors::BrightBlack,
        9 => AnsiColors::BrightRed,
        10 => AnsiColors::BrightGreen,
        11 => AnsiColors::BrightYellow,
        12 => AnsiColors::BrightBlue,
        13 => AnsiColors::BrightMagenta,
        14 => AnsiColors::BrightCyan,
        _ => AnsiColors::BrightWhite,
    }
}

/// Whether escape sequences should be emitted at all
pub fn colors_enabled(level: u8) -> bool {
    level > 0 && env::var_os("NO_COLOR").is_none() && cfg!(feature = "colors")
}

/// Style `text` with optional foreground, background and bold
pub fn paint(text: &str, fg: Option<&str>, bg: Option<&str>, bold: bool, level: u8) -> String {
    if text.is_empty() || !colors_enabled(level) {
        return text.to_string();
    }
    let fg = fg.and_then(Color::parse).and_then(|c| c.at_level(level));
    let bg = bg.and_then(Color::parse).and_then(|c| c.at_level(level));
    if fg.is_none() && bg.is_none() && !bold {
        return text.to_string();
    }
    styled(text, fg, bg, bold)
}

#[cfg(feature = "colors")]
fn styled(text: &str, fg: Option<Color>, bg: Option<Color>, bold: bool) -> String {
    let mut style = Style::new();
    if let Some(c) = fg {
        style = style.color(c.to_dyn());
    }
    if let Some(c) = bg {
        style = style.on_color(c.to_dyn());
    }
    if bold {
        style = style.bold();
    }
    text.style(style).to_string()
}

#[cfg(not(feature = "colors"))]
fn styled(text: &str, _fg: Option<Color>, _bg: Option<Color>, _bold: bool) -> String {
    text.to_string()
}

//! Terminal width probe.
//!
//! The status line runs with stdin and stdout piped, so the width is asked of
//! stdout, then stderr, then the controlling tty, and finally `COLUMNS`.

use terminal_size::{Width, terminal_size, terminal_size_of};

fn width_from_env() -> Option<u16> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|w| *w > 0)
}

#[cfg(unix)]
fn width_from_tty() -> Option<u16> {
    let tty = std::fs::File::open("/dev/tty").ok()?;
    terminal_size_of(&tty).map(|(Width(w), _)| w)
}

#[cfg(not(unix))]
fn width_from_tty() -> Option<u16> {
    None
}

/// Detected terminal columns, or `None` when no probe succeeds
pub fn terminal_width() -> Option<u16> {
    terminal_size()
        .map(|(Width(w), _)| w)
        .or_else(|| terminal_size_of(std::io::stderr()).map(|(Width(w), _)| w))
        .or_else(width_from_tty)
        .or_else(width_from_env)
        .filter(|w| *w > 0)
}

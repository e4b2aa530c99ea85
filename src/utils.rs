use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{IsTerminal, Read};
use unicode_width::UnicodeWidthChar;

/// Length of one usage block
pub const BLOCK_DURATION_HOURS: i64 = 5;
pub const BLOCK_DURATION_SECONDS: i64 = BLOCK_DURATION_HOURS * 60 * 60;

const DEFAULT_MAX_CONTEXT: u64 = 200_000;
const DEFAULT_USABLE_CONTEXT: u64 = 160_000;
const LARGE_MAX_CONTEXT: u64 = 1_000_000;
const LARGE_USABLE_CONTEXT: u64 = 800_000;

static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07]*\x07").unwrap());

/// Context window sizes for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    pub max_tokens: u64,
    pub usable_tokens: u64,
}

// Any model id tagged "[1m]" has the 1M context window; everything else is 200k
// with 80% considered usable before auto-compaction.
pub fn context_config(model_id: Option<&str>) -> ContextConfig {
    match model_id {
        Some(id) if id.to_lowercase().contains("[1m]") => ContextConfig {
            max_tokens: LARGE_MAX_CONTEXT,
            usable_tokens: LARGE_USABLE_CONTEXT,
        },
        _ => ContextConfig {
            max_tokens: DEFAULT_MAX_CONTEXT,
            usable_tokens: DEFAULT_USABLE_CONTEXT,
        },
    }
}

/// Percentage of `limit` used by `tokens`, capped at 100
pub fn context_percent(tokens: u64, limit: u64) -> f64 {
    if limit == 0 {
        return if tokens == 0 { 0.0 } else { 100.0 };
    }
    (tokens as f64 * 100.0 / limit as f64).min(100.0)
}

pub fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(buf);
    }
    stdin.lock().read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn format_path(p: &str) -> String {
    match directories::BaseDirs::new() {
        Some(b) => abbreviate_home(p, &b.home_dir().to_string_lossy()),
        None => p.to_owned(),
    }
}

/// Replace a leading `home` with `~`, only on a whole path segment
pub fn abbreviate_home(p: &str, home: &str) -> String {
    let home = home.trim_end_matches(['/', '\\']);
    if home.is_empty() {
        return p.to_owned();
    }
    match p.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => format!("~{rest}"),
        _ => p.to_owned(),
    }
}

pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

/// `<1m`, `45m`, `2hr`, `2hr 15m`
pub fn format_duration(d: TimeDelta) -> String {
    let total_minutes = d.num_minutes().max(0);
    if total_minutes < 1 {
        return "<1m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}hr"),
        (h, m) => format!("{h}hr {m}m"),
    }
}

pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Terminal column width of a string, ignoring escape sequences
pub fn display_width(s: &str) -> usize {
    strip_ansi(s)
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Cut `s` to at most `max` display columns, ending in `...` when anything was cut.
/// Escape sequences are copied through without counting towards the width.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0usize;
    let mut rest = s;
    let mut saw_escape = false;
    while !rest.is_empty() {
        if let Some(m) = ANSI_RE.find(rest).filter(|m| m.start() == 0) {
            out.push_str(m.as_str());
            rest = &rest[m.end()..];
            saw_escape = true;
            continue;
        }
        let Some(c) = rest.chars().next() else { break };
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
        rest = &rest[c.len_utf8()..];
    }
    if saw_escape {
        out.push_str("\x1b[0m");
    }
    out.push_str(&"..."[..max.min(3)]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_home() {
        assert_eq!(abbreviate_home("/home/me/x", "/home/me"), "~/x");
        assert_eq!(abbreviate_home("/home/me", "/home/me/"), "~");
        assert_eq!(abbreviate_home("/home/me2/x", "/home/me"), "/home/me2/x");
        assert_eq!(abbreviate_home("/srv/x", "/home/me"), "/srv/x");
        assert_eq!(abbreviate_home("/srv/x", ""), "/srv/x");
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(15_234), "15.2k");
        assert_eq!(format_tokens(1_250_000), "1.2M");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(30)), "<1m");
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45m");
        assert_eq!(format_duration(TimeDelta::minutes(120)), "2hr");
        assert_eq!(format_duration(TimeDelta::minutes(135)), "2hr 15m");
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "<1m");
    }

    #[test]
    fn test_context_config() {
        assert_eq!(context_config(None).max_tokens, 200_000);
        assert_eq!(context_config(Some("claude-sonnet-4")).usable_tokens, 160_000);
        let large = context_config(Some("claude-sonnet-4[1M]"));
        assert_eq!(large.max_tokens, 1_000_000);
        assert_eq!(large.usable_tokens, 800_000);
    }

    #[test]
    fn test_width_ignores_ansi() {
        assert_eq!(display_width("\x1b[36mabc\x1b[39m"), 3);
        assert_eq!(display_width("⎇ main"), 6);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
        let colored = truncate_to_width("\x1b[31mhello world\x1b[39m", 8);
        assert_eq!(strip_ansi(&colored), "hello...");
    }
}

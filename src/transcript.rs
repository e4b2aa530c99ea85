//! # Transcript Module
//!
//! Reads a session transcript (JSON lines) in a single streaming pass and
//! extracts token totals, the session's first/last timestamps and its latest
//! summary title.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::models::{TokenMetrics, TranscriptLine};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptSummary {
    pub tokens: TokenMetrics,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Most recent `summary` record
    pub name: Option<String>,
}

impl TranscriptSummary {
    /// Time between the first and last timestamped records
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.last_timestamp? - self.first_timestamp?)
    }
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

pub fn summarize(path: &Path) -> Result<TranscriptSummary> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript: {}", path.display()))?;
    Ok(summarize_reader(BufReader::new(file)))
}

pub fn summarize_reader<R: BufRead>(reader: R) -> TranscriptSummary {
    let mut summary = TranscriptSummary::default();
    let mut latest_main: Option<(DateTime<Utc>, u64)> = None;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        let parsed: TranscriptLine = match serde_json::from_str(t) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if parsed.r#type.as_deref() == Some("summary") {
            if let Some(name) = parsed.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                summary.name = Some(name.to_string());
            }
        }

        let ts = parsed.timestamp.as_deref().and_then(parse_timestamp);
        if let Some(ts) = ts {
            if summary.first_timestamp.is_none_or(|f| ts < f) {
                summary.first_timestamp = Some(ts);
            }
            if summary.last_timestamp.is_none_or(|l| ts > l) {
                summary.last_timestamp = Some(ts);
            }
        }

        let Some(usage) = parsed.message.and_then(|m| m.usage) else {
            continue;
        };
        let tokens = &mut summary.tokens;
        tokens.input += usage.input_tokens;
        tokens.output += usage.output_tokens;
        tokens.cached += usage.cache_read_input_tokens + usage.cache_creation_input_tokens;

        // Context length tracks the newest main-chain message only
        if !parsed.is_sidechain {
            if let Some(ts) = ts {
                let context = usage.input_tokens
                    + usage.cache_read_input_tokens
                    + usage.cache_creation_input_tokens;
                if latest_main.is_none_or(|(prev, _)| ts >= prev) {
                    latest_main = Some((ts, context));
                }
            }
        }
    }

    let tokens = &mut summary.tokens;
    tokens.total = tokens.input + tokens.output + tokens.cached;
    tokens.context_length = latest_main.map(|(_, c)| c).unwrap_or(0);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRANSCRIPT: &str = r#"
{"type":"user","timestamp":"2025-01-26T10:00:00Z","message":{"content":"hi"}}
{"type":"assistant","timestamp":"2025-01-26T10:01:00Z","message":{"usage":{"input_tokens":100,"output_tokens":50,"cache_read_input_tokens":1000,"cache_creation_input_tokens":200}}}
{"type":"assistant","timestamp":"2025-01-26T10:05:00Z","isSidechain":true,"message":{"usage":{"input_tokens":7,"output_tokens":3}}}
not json
{"type":"assistant","timestamp":"2025-01-26T12:16:00Z","message":{"usage":{"input_tokens":10,"output_tokens":5,"cache_read_input_tokens":2000}}}
{"type":"summary","summary":"Refactor status line"}
"#;

    #[test]
    fn test_summarize_tokens() {
        let s = summarize_reader(Cursor::new(TRANSCRIPT));
        assert_eq!(s.tokens.input, 117);
        assert_eq!(s.tokens.output, 58);
        assert_eq!(s.tokens.cached, 3200);
        assert_eq!(s.tokens.total, 117 + 58 + 3200);
        // newest main-chain message: 10 + 2000
        assert_eq!(s.tokens.context_length, 2010);
    }

    #[test]
    fn test_summarize_duration_and_name() {
        let s = summarize_reader(Cursor::new(TRANSCRIPT));
        assert_eq!(s.duration(), Some(TimeDelta::minutes(136)));
        assert_eq!(s.name.as_deref(), Some("Refactor status line"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(summarize(Path::new("/nonexistent/transcript.jsonl")).is_err());
    }
}

//! # Block Cache Module
//!
//! Works out when the current 5-hour usage block started.
//!
//! Scanning every transcript on each render is expensive, so the computed
//! start is memoized in a small JSON file per profile directory:
//!
//! ```text
//! <cache-root>/ccstatusline/block-cache-<sha256(abs config dir)[..16]>.json
//! { "startTime": "2025-01-26T14:00:00.000Z", "configDir": "/home/me/.claude" }
//! ```
//!
//! A cached start is trusted until it is one block duration old. Records
//! written for another profile, or legacy records without `configDir`, are
//! ignored once a specific profile is expected.

use anyhow::{Context, Result};
use chrono::{DateTime, DurationRound, SecondsFormat, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{self, APP_DIR_NAME};
use crate::models::{BlockMetrics, TranscriptLine};
use crate::transcript::parse_timestamp;
use crate::utils::BLOCK_DURATION_HOURS;

/// Transcript files untouched for longer than this cannot contribute to an active block
const SCAN_LOOKBACK_HOURS: i64 = BLOCK_DURATION_HOURS * 2;

fn block_duration() -> TimeDelta {
    TimeDelta::hours(BLOCK_DURATION_HOURS)
}

/// Absolute form with `.` and `..` folded lexically and no trailing separator
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

/// Absolute form of `config_dir`, or of the active profile directory when absent
fn resolve_config_dir(config_dir: Option<&Path>) -> PathBuf {
    match config_dir {
        Some(dir) => resolve_path(dir),
        None => resolve_path(&config::active_config_dir().unwrap_or_else(|| PathBuf::from(".claude"))),
    }
}

pub fn get_block_cache_path(config_dir: Option<&Path>) -> PathBuf {
    let resolved = resolve_config_dir(config_dir);
    let digest = Sha256::digest(resolved.to_string_lossy().as_bytes());
    let hash = format!("{:x}", digest);
    config::cache_root()
        .join(APP_DIR_NAME)
        .join(format!("block-cache-{}.json", &hash[..16]))
}

/// Cached block start, or `None` when the record is missing, malformed or
/// belongs to a different profile than `expected_config_dir`.
pub fn read_block_cache(expected_config_dir: Option<&Path>) -> Option<DateTime<Utc>> {
    let path = get_block_cache_path(expected_config_dir);
    let text = std::fs::read_to_string(&path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&text).ok()?;
    let start_time = value
        .get("startTime")
        .and_then(|v| v.as_str())
        .and_then(parse_timestamp)?;

    if let Some(expected) = expected_config_dir {
        let stored = value.get("configDir").and_then(|v| v.as_str())?;
        if resolve_path(Path::new(stored)) != resolve_path(expected) {
            debug!(stored, "block cache belongs to another profile");
            return None;
        }
    }
    Some(start_time)
}

/// Persist a block start. `configDir` is recorded only when a directory is given.
pub fn write_block_cache(start_time: DateTime<Utc>, config_dir: Option<&Path>) -> Result<()> {
    let path = get_block_cache_path(config_dir);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
    }
    let mut obj = serde_json::json!({
        "startTime": start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    if let Some(dir) = config_dir {
        obj["configDir"] = serde_json::Value::String(resolve_path(dir).to_string_lossy().into_owned());
    }
    std::fs::write(&path, obj.to_string())
        .with_context(|| format!("Failed to write block cache: {}", path.display()))?;
    Ok(())
}

pub fn get_cached_block_metrics(config_dir: Option<&Path>) -> Option<BlockMetrics> {
    get_cached_block_metrics_at(config_dir, Utc::now())
}

/// Cache fast path only: the cached start if it is younger than one block
pub fn get_cached_block_metrics_at(
    config_dir: Option<&Path>,
    now: DateTime<Utc>,
) -> Option<BlockMetrics> {
    let start = read_block_cache(config_dir)?;
    let age = now - start;
    if age < TimeDelta::zero() || age >= block_duration() {
        debug!(%start, "block cache expired");
        return None;
    }
    Some(BlockMetrics::new(start))
}

/// Cached start when fresh; otherwise scan transcripts and cache the result
pub fn get_block_metrics(config_dir: Option<&Path>) -> Option<BlockMetrics> {
    let now = Utc::now();
    let dir = resolve_config_dir(config_dir);
    if let Some(metrics) = get_cached_block_metrics_at(Some(&dir), now) {
        debug!(start = %metrics.start_time, "block cache hit");
        return Some(metrics);
    }
    let start = compute_block_start(&dir, now)?;
    if let Err(err) = write_block_cache(start, Some(&dir)) {
        warn!("{err:#}");
    }
    Some(BlockMetrics::new(start))
}

fn usage_timestamps(path: &Path, out: &mut Vec<DateTime<Utc>>) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    for line in BufReader::new(file).lines().map_while(Result::ok) {
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<TranscriptLine>(t) else {
            continue;
        };
        if entry.message.as_ref().and_then(|m| m.usage).is_none() {
            continue;
        }
        if let Some(ts) = entry.timestamp.as_deref().and_then(parse_timestamp) {
            out.push(ts);
        }
    }
}

fn floor_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}

/// Start of the block containing the latest of `timestamps`, if that block is still active at `now`
pub fn active_block_start(
    mut timestamps: Vec<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    timestamps.sort();
    let mut block: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for ts in timestamps {
        block = match block {
            Some((start, last)) if ts - start < block_duration() && ts - last < block_duration() => {
                Some((start, ts))
            }
            _ => Some((floor_to_hour(ts), ts)),
        };
    }
    let (start, last) = block?;
    (now - start < block_duration() && now - last < block_duration()).then_some(start)
}

/// Scan `<config_dir>/projects/**/*.jsonl` for the active block start
pub fn compute_block_start(config_dir: &Path, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let projects = config_dir.join("projects");
    if !projects.is_dir() {
        return None;
    }
    let cutoff = now - TimeDelta::hours(SCAN_LOOKBACK_HOURS);
    let mut timestamps = Vec::new();
    for entry in WalkDir::new(&projects)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "jsonl") {
            continue;
        }
        let recent = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from)
            .is_some_and(|modified| modified >= cutoff);
        if recent {
            usage_timestamps(path, &mut timestamps);
        }
    }
    debug!(count = timestamps.len(), "scanned usage timestamps");
    active_block_start(timestamps, now)
}

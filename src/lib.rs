//! # ccstatusline
//!
//! A configurable status line for Claude Code sessions, composed from
//! user-arranged widgets.
//!
//! ## Overview
//!
//! The host CLI pipes its session JSON to the binary on every refresh. Each
//! configured line is rendered by asking every widget for a fragment and
//! joining the fragments with separators, merge seams, flex padding or
//! powerline segments:
//! - Model, output style, version and working directory
//! - Git branch, changes, root directory and worktree
//! - Token counts and context window usage from the session transcript
//! - Session clock, cost and the current 5-hour usage block
//! - Custom text and custom shell commands
//!
//! ## Features
//!
//! - `colors` (default): Enables terminal color output via owo-colors

/// Usage block start detection and its per-profile cache
pub mod block_cache;

/// Command-line argument parsing
pub mod cli;

/// Color names and ANSI styling
pub mod colors;

/// Settings file and directory resolution
pub mod config;

/// Per-render context handed to widgets
pub mod context;

/// Git queries against the session's working directory
pub mod git;

/// Item list edits used by the configuration editor
pub mod items;

/// Data models for settings, items, session input and metrics
pub mod models;

/// Line composition
pub mod render;

/// Terminal width detection
pub mod terminal;

/// Transcript parsing for token and session metrics
pub mod transcript;

/// Utility functions for formatting, widths and context limits
pub mod utils;

/// Widget trait, registry and catalog
pub mod widgets;

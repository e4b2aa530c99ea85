//! Per-render context handed to every widget.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::block_cache;
use crate::git::{GitRunner, SystemGit};
use crate::models::{BlockMetrics, ItemKind, Settings, StatusJson, TokenMetrics, WidgetKind};
use crate::transcript;

/// Ephemeral state for one render pass
#[derive(Clone)]
pub struct RenderContext {
    /// Widgets return fixed sample values instead of probing the environment
    pub is_preview: bool,
    pub data: Option<StatusJson>,
    pub token_metrics: Option<TokenMetrics>,
    pub session_duration: Option<String>,
    pub session_name: Option<String>,
    pub block_metrics: Option<BlockMetrics>,
    /// Detected terminal columns, `None` when undetectable
    pub terminal_width: Option<u16>,
    pub now: DateTime<Utc>,
    pub git: Arc<dyn GitRunner>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            is_preview: false,
            data: None,
            token_metrics: None,
            session_duration: None,
            session_name: None,
            block_metrics: None,
            terminal_width: None,
            now: Utc::now(),
            git: Arc::new(SystemGit),
        }
    }
}

impl RenderContext {
    pub fn preview() -> Self {
        Self {
            is_preview: true,
            ..Self::default()
        }
    }

    pub fn with_data(data: StatusJson) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_git(mut self, git: Arc<dyn GitRunner>) -> Self {
        self.git = git;
        self
    }

    pub fn with_terminal_width(mut self, width: Option<u16>) -> Self {
        self.terminal_width = width;
        self
    }

    /// Context for a live session: transcript metrics and block metrics are
    /// loaded only when some configured item needs them.
    pub fn for_session(data: StatusJson, settings: &Settings, config_dir: Option<&Path>) -> Self {
        let kinds: Vec<WidgetKind> = settings
            .lines
            .iter()
            .flatten()
            .filter_map(|item| match item.item_kind() {
                ItemKind::Widget(kind) => Some(kind),
                _ => None,
            })
            .collect();
        let needs_transcript = kinds.iter().any(WidgetKind::needs_transcript)
            || settings.flex_mode == crate::models::FlexMode::FullUntilCompact;
        let needs_block = kinds.contains(&WidgetKind::BlockTimer);

        let mut context = Self::with_data(data);

        if needs_transcript {
            if let Some(path) = context.data.as_ref().and_then(|d| d.transcript_path.clone()) {
                match transcript::summarize(Path::new(&path)) {
                    Ok(summary) => {
                        context.token_metrics = Some(summary.tokens);
                        context.session_duration = summary.duration().map(crate::utils::format_duration);
                        context.session_name = summary.name;
                    }
                    Err(err) => debug!("transcript unavailable: {err:#}"),
                }
            }
        }

        if needs_block {
            context.block_metrics = block_cache::get_block_metrics(config_dir);
        }

        context
    }
}

//! Session-scoped widgets: elapsed time, cost, usage block, identifiers.

use chrono::TimeDelta;

use super::{CustomKeybind, EditorDisplay, Widget, labeled};
use crate::context::RenderContext;
use crate::models::{Settings, WidgetItem};
use crate::utils::BLOCK_DURATION_SECONDS;

pub struct SessionClockWidget;

impl Widget for SessionClockWidget {
    fn display_name(&self) -> &'static str {
        "Session Clock"
    }
    fn description(&self) -> &'static str {
        "Shows elapsed time since current session started"
    }
    fn category(&self) -> &'static str {
        "Session"
    }
    fn default_color(&self) -> &'static str {
        "yellow"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Session: ", "2hr 15m"));
        }
        let duration = context.session_duration.as_deref()?;
        Some(labeled(item, "Session: ", duration))
    }
}

pub struct SessionCostWidget;

impl Widget for SessionCostWidget {
    fn display_name(&self) -> &'static str {
        "Session Cost"
    }
    fn description(&self) -> &'static str {
        "Shows the total session cost in USD"
    }
    fn category(&self) -> &'static str {
        "Session"
    }
    fn default_color(&self) -> &'static str {
        "green"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Cost: ", "$2.45"));
        }
        let cost = context.data.as_ref()?.cost.as_ref()?.total_cost_usd?;
        Some(labeled(item, "Cost: ", &format!("${cost:.2}")))
    }
}

pub const DISPLAY: &str = "display";
const TOGGLE_PROGRESS: &str = "toggle-progress";
const FULL_BAR_WIDTH: usize = 32;
const SHORT_BAR_WIDTH: usize = 16;

static BLOCK_KEYBINDS: [CustomKeybind; 1] = [CustomKeybind {
    key: "p",
    label: "(p)rogress toggle",
    action: TOGGLE_PROGRESS,
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockDisplay {
    Time,
    Progress,
    ProgressShort,
}

impl BlockDisplay {
    fn of(item: &WidgetItem) -> Self {
        match item.meta(DISPLAY) {
            Some("progress") => Self::Progress,
            Some("progress-short") => Self::ProgressShort,
            _ => Self::Time,
        }
    }

    fn next(self) -> &'static str {
        match self {
            Self::Time => "progress",
            Self::Progress => "progress-short",
            Self::ProgressShort => "time",
        }
    }
}

/// `[████░░░░] 50.0%` with `width` cells
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}] {percent:.1}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

fn format_elapsed(elapsed: TimeDelta) -> String {
    let minutes = elapsed.num_minutes().max(0);
    format!("{}hr {}m", minutes / 60, minutes % 60)
}

pub struct BlockTimerWidget;

impl Widget for BlockTimerWidget {
    fn display_name(&self) -> &'static str {
        "Block Timer"
    }
    fn description(&self) -> &'static str {
        "Shows elapsed time since beginning of current 5hr block"
    }
    fn category(&self) -> &'static str {
        "Session"
    }
    fn default_color(&self) -> &'static str {
        "yellow"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        match BlockDisplay::of(item) {
            BlockDisplay::Time => EditorDisplay::new(self.display_name(), &[]),
            BlockDisplay::Progress => EditorDisplay::new(self.display_name(), &["progress bar"]),
            BlockDisplay::ProgressShort => EditorDisplay::new(self.display_name(), &["short bar"]),
        }
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &BLOCK_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        (action == TOGGLE_PROGRESS)
            .then(|| item.clone().with_meta(DISPLAY, BlockDisplay::of(item).next()))
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        let elapsed = if context.is_preview {
            TimeDelta::minutes(225)
        } else {
            context
                .block_metrics
                .map(|m| m.elapsed(context.now))
                .unwrap_or_else(TimeDelta::zero)
        };
        let percent = elapsed.num_seconds() as f64 * 100.0 / BLOCK_DURATION_SECONDS as f64;
        let value = match BlockDisplay::of(item) {
            BlockDisplay::Time => return Some(labeled(item, "Block: ", &format_elapsed(elapsed))),
            BlockDisplay::Progress => progress_bar(percent, FULL_BAR_WIDTH),
            BlockDisplay::ProgressShort => progress_bar(percent, SHORT_BAR_WIDTH),
        };
        Some(labeled(item, "Block ", &value))
    }
}

pub struct ClaudeSessionIdWidget;

impl Widget for ClaudeSessionIdWidget {
    fn display_name(&self) -> &'static str {
        "Claude Session ID"
    }
    fn description(&self) -> &'static str {
        "Shows the current Claude Code session ID"
    }
    fn category(&self) -> &'static str {
        "Session"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Session ID: ", "preview-session-id"));
        }
        let id = context.data.as_ref()?.session_id.as_deref()?;
        Some(labeled(item, "Session ID: ", id))
    }
}

pub struct SessionNameWidget;

impl Widget for SessionNameWidget {
    fn display_name(&self) -> &'static str {
        "Session Name"
    }
    fn description(&self) -> &'static str {
        "Shows the session name from the latest transcript summary"
    }
    fn category(&self) -> &'static str {
        "Session"
    }
    fn default_color(&self) -> &'static str {
        "magenta"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Name: ", "Refactor status line"));
        }
        let name = context.session_name.as_deref()?;
        Some(labeled(item, "Name: ", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockMetrics;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50.0, 4), "[██░░] 50.0%");
        assert_eq!(progress_bar(0.0, 2), "[░░] 0.0%");
        assert_eq!(progress_bar(150.0, 2), "[██] 150.0%");
    }

    #[test]
    fn test_block_timer_modes() {
        let settings = Settings::default();
        let now = Utc.with_ymd_and_hms(2025, 1, 26, 16, 30, 0).unwrap();
        let ctx = RenderContext {
            block_metrics: Some(BlockMetrics::new(now - TimeDelta::minutes(150))),
            now,
            ..RenderContext::default()
        };
        let item = WidgetItem::new("1", "block-timer");
        assert_eq!(
            BlockTimerWidget.render(&item, &ctx, &settings).as_deref(),
            Some("Block: 2hr 30m")
        );

        let short = BlockTimerWidget.handle_editor_action("toggle-progress", &item).unwrap();
        let short = BlockTimerWidget.handle_editor_action("toggle-progress", &short).unwrap();
        assert_eq!(short.meta(DISPLAY), Some("progress-short"));
        assert_eq!(
            BlockTimerWidget.render(&short, &ctx, &settings).as_deref(),
            Some("Block [████████░░░░░░░░] 50.0%")
        );
    }

    #[test]
    fn test_block_timer_without_metrics() {
        let settings = Settings::default();
        let item = WidgetItem::new("1", "block-timer");
        assert_eq!(
            BlockTimerWidget
                .render(&item, &RenderContext::default(), &settings)
                .as_deref(),
            Some("Block: 0hr 0m")
        );
    }

    #[test]
    fn test_session_cost() {
        let settings = Settings::default();
        let ctx = RenderContext::with_data(
            serde_json::from_str(r#"{"cost":{"total_cost_usd":1.5}}"#).unwrap(),
        );
        let item = WidgetItem::new("1", "session-cost");
        assert_eq!(
            SessionCostWidget.render(&item, &ctx, &settings).as_deref(),
            Some("Cost: $1.50")
        );
    }
}

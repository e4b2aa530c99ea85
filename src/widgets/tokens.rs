//! Token counters and context window usage, fed by the transcript metrics.

use super::{CustomKeybind, EditorDisplay, Widget, labeled};
use crate::context::RenderContext;
use crate::models::{Settings, TokenMetrics, WidgetItem};
use crate::utils::{context_config, context_percent, format_tokens};

fn render_count(
    item: &WidgetItem,
    context: &RenderContext,
    label: &str,
    preview: &str,
    pick: fn(&TokenMetrics) -> u64,
) -> Option<String> {
    if context.is_preview {
        return Some(labeled(item, label, preview));
    }
    let metrics = context.token_metrics.as_ref()?;
    Some(labeled(item, label, &format_tokens(pick(metrics))))
}

pub struct TokensInputWidget;

impl Widget for TokensInputWidget {
    fn display_name(&self) -> &'static str {
        "Tokens Input"
    }
    fn description(&self) -> &'static str {
        "Shows input token count for the current session"
    }
    fn category(&self) -> &'static str {
        "Tokens"
    }
    fn default_color(&self) -> &'static str {
        "blue"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        render_count(item, context, "In: ", "15.2k", |m| m.input)
    }
}

pub struct TokensOutputWidget;

impl Widget for TokensOutputWidget {
    fn display_name(&self) -> &'static str {
        "Tokens Output"
    }
    fn description(&self) -> &'static str {
        "Shows output token count for the current session"
    }
    fn category(&self) -> &'static str {
        "Tokens"
    }
    fn default_color(&self) -> &'static str {
        "white"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        render_count(item, context, "Out: ", "3.4k", |m| m.output)
    }
}

pub struct TokensCachedWidget;

impl Widget for TokensCachedWidget {
    fn display_name(&self) -> &'static str {
        "Tokens Cached"
    }
    fn description(&self) -> &'static str {
        "Shows cached token count for the current session"
    }
    fn category(&self) -> &'static str {
        "Tokens"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        render_count(item, context, "Cached: ", "12.0k", |m| m.cached)
    }
}

pub struct TokensTotalWidget;

impl Widget for TokensTotalWidget {
    fn display_name(&self) -> &'static str {
        "Tokens Total"
    }
    fn description(&self) -> &'static str {
        "Shows total token count (input + output + cache) for the current session"
    }
    fn category(&self) -> &'static str {
        "Tokens"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        render_count(item, context, "Total: ", "30.6k", |m| m.total)
    }
}

pub struct ContextLengthWidget;

impl Widget for ContextLengthWidget {
    fn display_name(&self) -> &'static str {
        "Context Length"
    }
    fn description(&self) -> &'static str {
        "Shows the current context window size in tokens"
    }
    fn category(&self) -> &'static str {
        "Context"
    }
    fn default_color(&self) -> &'static str {
        "brightBlack"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        render_count(item, context, "Ctx: ", "18.6k", |m| m.context_length)
    }
}

pub const INVERSE: &str = "inverse";
const TOGGLE_INVERSE: &str = "toggle-inverse";

static PERCENT_KEYBINDS: [CustomKeybind; 1] = [CustomKeybind {
    key: "u",
    label: "(u)sed/remaining",
    action: TOGGLE_INVERSE,
}];

/// Percentage of the model's context window used, or remaining when `inverse` is set
fn percent_value(item: &WidgetItem, context: &RenderContext, usable: bool) -> Option<f64> {
    let tokens = if context.is_preview {
        18_600
    } else {
        context.token_metrics.as_ref()?.context_length
    };
    let model_id = context.data.as_ref().and_then(|d| d.model_id());
    let config = context_config(model_id);
    let limit = if usable {
        config.usable_tokens
    } else {
        config.max_tokens
    };
    let pct = context_percent(tokens, limit);
    Some(if item.meta_flag(INVERSE) { 100.0 - pct } else { pct })
}

fn percent_display(name: &str, item: &WidgetItem) -> EditorDisplay {
    if item.meta_flag(INVERSE) {
        EditorDisplay::new(name, &["remaining"])
    } else {
        EditorDisplay::new(name, &[])
    }
}

pub struct ContextPercentageWidget;

impl Widget for ContextPercentageWidget {
    fn display_name(&self) -> &'static str {
        "Context %"
    }
    fn description(&self) -> &'static str {
        "Shows percentage of context window used (of the model's max tokens)"
    }
    fn category(&self) -> &'static str {
        "Context"
    }
    fn default_color(&self) -> &'static str {
        "blue"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        percent_display(self.display_name(), item)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &PERCENT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        (action == TOGGLE_INVERSE).then(|| item.toggled_flag(INVERSE))
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        let pct = percent_value(item, context, false)?;
        Some(labeled(item, "Ctx: ", &format!("{pct:.1}%")))
    }
}

pub struct ContextPercentageUsableWidget;

impl Widget for ContextPercentageUsableWidget {
    fn display_name(&self) -> &'static str {
        "Context % (usable)"
    }
    fn description(&self) -> &'static str {
        "Shows percentage of usable context window used (80% of max before auto-compact)"
    }
    fn category(&self) -> &'static str {
        "Context"
    }
    fn default_color(&self) -> &'static str {
        "green"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        percent_display(self.display_name(), item)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &PERCENT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        (action == TOGGLE_INVERSE).then(|| item.toggled_flag(INVERSE))
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        let pct = percent_value(item, context, true)?;
        Some(labeled(item, "Ctx(u): ", &format!("{pct:.1}%")))
    }
}

//! Widgets showing values straight from the session JSON or the environment.

use super::{CustomKeybind, EditorDisplay, Widget, labeled};
use crate::context::RenderContext;
use crate::models::{Settings, WidgetItem};
use crate::utils::format_path;

pub struct ModelWidget;

impl Widget for ModelWidget {
    fn display_name(&self) -> &'static str {
        "Model"
    }
    fn description(&self) -> &'static str {
        "Displays the Claude model name (e.g., Claude 3.5 Sonnet)"
    }
    fn category(&self) -> &'static str {
        "Core"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Model: ", "Claude"));
        }
        let name = context.data.as_ref()?.model_display_name()?;
        Some(labeled(item, "Model: ", name))
    }
}

pub struct OutputStyleWidget;

impl Widget for OutputStyleWidget {
    fn display_name(&self) -> &'static str {
        "Output Style"
    }
    fn description(&self) -> &'static str {
        "Shows the current Claude Code output style"
    }
    fn category(&self) -> &'static str {
        "Core"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Style: ", "default"));
        }
        let style = context.data.as_ref()?.output_style.as_ref()?;
        Some(labeled(item, "Style: ", &style.name))
    }
}

pub const ABBREVIATE_HOME: &str = "abbreviateHome";
pub const SEGMENTS: &str = "segments";

static CWD_KEYBINDS: [CustomKeybind; 2] = [
    CustomKeybind {
        key: "h",
        label: "(h)ome as ~",
        action: "toggle-home",
    },
    CustomKeybind {
        key: "s",
        label: "(s)egments",
        action: "edit-segments",
    },
];

/// Keep the last `segments` path components, prefixed with `.../`
pub fn last_segments(path: &str, segments: usize) -> String {
    let parts: Vec<&str> = path.split(['/', '\\']).filter(|p| !p.is_empty()).collect();
    if segments == 0 || parts.len() <= segments {
        return path.to_string();
    }
    format!(".../{}", parts[parts.len() - segments..].join("/"))
}

pub struct CurrentWorkingDirWidget;

impl CurrentWorkingDirWidget {
    fn format(item: &WidgetItem, dir: &str) -> String {
        let mut dir = if item.meta_flag(ABBREVIATE_HOME) {
            format_path(dir)
        } else {
            dir.to_string()
        };
        if let Some(n) = item.meta(SEGMENTS).and_then(|s| s.parse::<usize>().ok()) {
            dir = last_segments(&dir, n);
        }
        labeled(item, "cwd: ", &dir)
    }
}

impl Widget for CurrentWorkingDirWidget {
    fn display_name(&self) -> &'static str {
        "Current Working Dir"
    }
    fn description(&self) -> &'static str {
        "Shows the current working directory"
    }
    fn category(&self) -> &'static str {
        "Environment"
    }
    fn default_color(&self) -> &'static str {
        "blue"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        let mut modifiers = Vec::new();
        if item.meta_flag(ABBREVIATE_HOME) {
            modifiers.push("~".to_string());
        }
        if let Some(n) = item.meta(SEGMENTS) {
            modifiers.push(format!("{n} segments"));
        }
        let refs: Vec<&str> = modifiers.iter().map(String::as_str).collect();
        EditorDisplay::new(self.display_name(), &refs)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &CWD_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        match action {
            "toggle-home" => Some(item.toggled_flag(ABBREVIATE_HOME)),
            _ => None,
        }
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(Self::format(item, "/Users/example/project"));
        }
        let data = context.data.as_ref()?;
        let dir = data
            .current_dir()
            .or(data.cwd.as_deref())
            .filter(|d| !d.trim().is_empty())?;
        Some(Self::format(item, dir))
    }
}

pub struct TerminalWidthWidget;

impl Widget for TerminalWidthWidget {
    fn display_name(&self) -> &'static str {
        "Terminal Width"
    }
    fn description(&self) -> &'static str {
        "Shows detected terminal width (for debugging)"
    }
    fn category(&self) -> &'static str {
        "Environment"
    }
    fn default_color(&self) -> &'static str {
        "gray"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Term: ", "80"));
        }
        let width = context.terminal_width?;
        Some(labeled(item, "Term: ", &width.to_string()))
    }
}

pub struct VersionWidget;

impl Widget for VersionWidget {
    fn display_name(&self) -> &'static str {
        "Version"
    }
    fn description(&self) -> &'static str {
        "Shows the Claude Code version"
    }
    fn category(&self) -> &'static str {
        "Core"
    }
    fn default_color(&self) -> &'static str {
        "gray"
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(labeled(item, "Version: ", "1.0.72"));
        }
        let version = context.data.as_ref()?.version.as_deref()?;
        Some(labeled(item, "Version: ", version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusJson;

    fn data(json: &str) -> RenderContext {
        RenderContext::with_data(serde_json::from_str::<StatusJson>(json).unwrap())
    }

    #[test]
    fn test_last_segments() {
        assert_eq!(last_segments("/a/b/c/d", 2), ".../c/d");
        assert_eq!(last_segments("/a/b", 2), "/a/b");
        assert_eq!(last_segments("/a/b", 0), "/a/b");
    }

    #[test]
    fn test_model_render() {
        let settings = Settings::default();
        let ctx = data(r#"{"model":{"id":"claude-opus-4","display_name":"Opus 4"}}"#);
        let item = WidgetItem::new("1", "model");
        assert_eq!(ModelWidget.render(&item, &ctx, &settings).as_deref(), Some("Model: Opus 4"));

        let raw = WidgetItem {
            raw_value: Some(true),
            ..item.clone()
        };
        assert_eq!(ModelWidget.render(&raw, &ctx, &settings).as_deref(), Some("Opus 4"));
        assert_eq!(ModelWidget.render(&item, &RenderContext::default(), &settings), None);
    }

    #[test]
    fn test_cwd_segments() {
        let settings = Settings::default();
        let ctx = data(r#"{"workspace":{"current_dir":"/home/me/src/app"}}"#);
        let item = WidgetItem::new("1", "current-working-dir").with_meta(SEGMENTS, "2");
        assert_eq!(
            CurrentWorkingDirWidget.render(&item, &ctx, &settings).as_deref(),
            Some("cwd: .../src/app")
        );
    }

    #[test]
    fn test_terminal_width_needs_width() {
        let settings = Settings::default();
        let item = WidgetItem::new("1", "terminal-width");
        assert_eq!(TerminalWidthWidget.render(&item, &RenderContext::default(), &settings), None);
        let ctx = RenderContext::default().with_terminal_width(Some(132));
        assert_eq!(
            TerminalWidthWidget.render(&item, &ctx, &settings).as_deref(),
            Some("Term: 132")
        );
    }
}

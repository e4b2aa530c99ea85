//! # Render Module
//!
//! Composes configured items into status line text.
//!
//! Plain mode joins widget fragments with manual separators, the default
//! separator, merge seams and flex padding. Powerline mode drops both
//! separator kinds and draws each widget as a colored segment instead.

use tracing::debug;

use crate::colors::{POWERLINE_PALETTE, paint};
use crate::context::RenderContext;
use crate::models::{FlexMode, ItemKind, MergeMode, Settings, WidgetItem};
use crate::utils::{context_config, context_percent, display_width, strip_ansi, truncate_to_width};
use crate::widgets::widget_for;

/// Columns held back for the host's own notices in the `-40` flex modes
const RESERVED_COLUMNS: usize = 40;

/// Render the undecorated glyph of a separator with its surrounding spacing
pub fn format_separator(ch: &str) -> String {
    match ch {
        "|" => " | ".to_string(),
        "-" => " - ".to_string(),
        "," => ", ".to_string(),
        " " => " ".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    Widget,
    Separator,
    Flex,
}

/// An item that survived rendering, with its styled text
struct Part<'a> {
    item: &'a WidgetItem,
    kind: PartKind,
    text: String,
}

fn is_bold(item: &WidgetItem, settings: &Settings) -> bool {
    item.bold.unwrap_or(settings.global_bold)
}

/// Widget text and its resolved foreground color
fn render_widget(
    item: &WidgetItem,
    context: &RenderContext,
    settings: &Settings,
) -> Option<(String, Option<String>)> {
    let ItemKind::Widget(kind) = item.item_kind() else {
        return None;
    };
    let widget = widget_for(kind);
    let text = widget.render(item, context, settings)?;
    let fg = widget
        .supports_colors(item)
        .then(|| item.color.clone().unwrap_or_else(|| widget.default_color().to_string()));
    Some((text, fg))
}

fn collect_parts<'a>(
    items: &'a [WidgetItem],
    settings: &Settings,
    context: &RenderContext,
) -> Vec<Part<'a>> {
    let mut parts: Vec<Part<'a>> = Vec::new();
    for item in items {
        match item.item_kind() {
            ItemKind::Separator => {
                // needs a rendered widget before it, and never doubles up
                if !settings.manual_separators_allowed()
                    || !parts.iter().any(|p| p.kind == PartKind::Widget)
                    || parts.last().is_some_and(|p| p.kind == PartKind::Separator)
                {
                    continue;
                }
                let text = paint(
                    &format_separator(item.separator_char()),
                    item.color.as_deref(),
                    item.background_color.as_deref(),
                    is_bold(item, settings),
                    settings.color_level,
                );
                parts.push(Part {
                    item,
                    kind: PartKind::Separator,
                    text,
                });
            }
            ItemKind::FlexSeparator => {
                if settings.flex_separators_allowed() {
                    parts.push(Part {
                        item,
                        kind: PartKind::Flex,
                        text: String::new(),
                    });
                }
            }
            ItemKind::Widget(_) => {
                let Some((text, fg)) = render_widget(item, context, settings) else {
                    continue;
                };
                let text = paint(
                    &text,
                    fg.as_deref(),
                    item.background_color.as_deref(),
                    is_bold(item, settings),
                    settings.color_level,
                );
                parts.push(Part {
                    item,
                    kind: PartKind::Widget,
                    text,
                });
            }
            ItemKind::Unknown => debug!(kind = %item.kind, "skipping unknown widget type"),
        }
    }
    while parts.last().is_some_and(|p| p.kind == PartKind::Separator) {
        parts.pop();
    }
    parts
}

/// Columns the line may occupy, `None` when the terminal width is unknown
pub fn available_width(settings: &Settings, context: &RenderContext) -> Option<usize> {
    let width = context.terminal_width? as usize;
    let reserved = match settings.flex_mode {
        FlexMode::Full => 0,
        FlexMode::FullMinus40 => RESERVED_COLUMNS,
        FlexMode::FullUntilCompact => {
            let used = context.token_metrics.map_or(0, |m| m.context_length);
            let model_id = context.data.as_ref().and_then(|d| d.model_id());
            let pct = context_percent(used, context_config(model_id).max_tokens);
            if pct >= settings.compact_threshold as f64 {
                RESERVED_COLUMNS
            } else {
                0
            }
        }
    };
    Some(width.saturating_sub(reserved)).filter(|w| *w > 0)
}

enum Piece {
    Text(String),
    Flex,
}

/// Text placed between two adjacent parts
fn seam(prev: &Part, cur: &Part, settings: &Settings) -> String {
    if prev.kind == PartKind::Widget {
        match prev.item.merge {
            MergeMode::Merge => return " ".to_string(),
            MergeMode::NoPadding => return String::new(),
            MergeMode::None => {}
        }
    }
    match settings.default_separator() {
        Some(sep) if prev.kind == PartKind::Widget && cur.kind == PartKind::Widget => paint(
            &format_separator(sep),
            None,
            None,
            settings.global_bold,
            settings.color_level,
        ),
        _ => String::new(),
    }
}

fn render_plain(items: &[WidgetItem], settings: &Settings, context: &RenderContext) -> String {
    let parts = collect_parts(items, settings, context);
    let padding = settings.padding();
    let mut pieces: Vec<Piece> = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &parts[p]);
        if let Some(prev) = prev {
            pieces.push(Piece::Text(seam(prev, part, settings)));
        }
        match part.kind {
            PartKind::Flex => pieces.push(Piece::Flex),
            PartKind::Separator => pieces.push(Piece::Text(part.text.clone())),
            PartKind::Widget => {
                let merged_in = prev.is_some_and(|p| p.kind == PartKind::Widget && !p.item.merge.is_none());
                let merges_out = !part.item.merge.is_none() && i + 1 < parts.len();
                let mut text = String::new();
                if !merged_in {
                    text.push_str(padding);
                }
                text.push_str(&part.text);
                if !merges_out {
                    text.push_str(padding);
                }
                pieces.push(Piece::Text(text));
            }
        }
    }

    let width = available_width(settings, context);
    let flex_count = pieces.iter().filter(|p| matches!(p, Piece::Flex)).count();
    let content: usize = pieces
        .iter()
        .map(|p| match p {
            Piece::Text(t) => display_width(t),
            Piece::Flex => 0,
        })
        .sum();

    let mut fills: Vec<String> = Vec::with_capacity(flex_count);
    match width {
        Some(w) if flex_count > 0 => {
            let free = w.saturating_sub(content);
            for n in 0..flex_count {
                let extra = usize::from(n < free % flex_count);
                fills.push(" ".repeat(free / flex_count + extra));
            }
        }
        // Width unknown: a flex separator behaves like a plain one
        _ => fills.resize(flex_count, format_separator("|")),
    }

    let mut fills = fills.into_iter();
    let mut line = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(t) => line.push_str(&t),
            Piece::Flex => line.push_str(&fills.next().unwrap_or_default()),
        }
    }
    fit(line, width)
}

fn fit(line: String, width: Option<usize>) -> String {
    match width {
        Some(w) if display_width(&line) > w => truncate_to_width(&line, w),
        _ => line,
    }
}

fn render_powerline(items: &[WidgetItem], settings: &Settings, context: &RenderContext) -> String {
    let powerline = &settings.powerline;
    let level = settings.color_level;
    let auto = powerline.auto_backgrounds();

    struct Segment<'a> {
        item: &'a WidgetItem,
        text: String,
        fg: Option<String>,
        bg: Option<String>,
    }

    let mut segments: Vec<Segment> = Vec::new();
    for item in items {
        if item.item_kind().is_layout() {
            continue;
        }
        let Some((text, fg)) = render_widget(item, context, settings) else {
            continue;
        };
        let bg = item.background_color.clone().or_else(|| {
            auto.then(|| POWERLINE_PALETTE[segments.len() % POWERLINE_PALETTE.len()].to_string())
        });
        segments.push(Segment { item, text, fg, bg });
    }
    if segments.is_empty() {
        return String::new();
    }

    let mut line = String::new();
    if let Some(cap) = powerline.start_cap.as_deref() {
        line.push_str(&paint(cap, segments[0].bg.as_deref(), None, false, level));
    }
    for (i, seg) in segments.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &segments[p]);
        let merged_in = prev.is_some_and(|p| !p.item.merge.is_none());
        let tight_in = prev.is_some_and(|p| p.item.merge == MergeMode::NoPadding);
        let tight_out = seg.item.merge == MergeMode::NoPadding && i + 1 < segments.len();

        if let Some(prev) = prev {
            if !merged_in {
                line.push_str(&paint(
                    &powerline.separator,
                    prev.bg.as_deref(),
                    seg.bg.as_deref(),
                    false,
                    level,
                ));
            }
        }
        let text = format!(
            "{}{}{}",
            if tight_in { "" } else { " " },
            seg.text,
            if tight_out { "" } else { " " }
        );
        line.push_str(&paint(
            &text,
            seg.fg.as_deref(),
            seg.bg.as_deref(),
            is_bold(seg.item, settings),
            level,
        ));
    }

    let last_bg = segments.last().and_then(|s| s.bg.as_deref());
    match powerline.end_cap.as_deref() {
        Some(cap) => line.push_str(&paint(cap, last_bg, None, false, level)),
        None if last_bg.is_some() => {
            line.push_str(&paint(&powerline.separator, last_bg, None, false, level))
        }
        None => {}
    }
    fit(line, available_width(settings, context))
}

/// Compose one line of items
pub fn render_status_line(
    items: &[WidgetItem],
    settings: &Settings,
    context: &RenderContext,
) -> String {
    if settings.powerline.enabled {
        render_powerline(items, settings, context)
    } else {
        render_plain(items, settings, context)
    }
}

/// Every configured line, skipping lines that render to nothing
pub fn render_lines(settings: &Settings, context: &RenderContext) -> Vec<String> {
    settings
        .lines
        .iter()
        .map(|items| render_status_line(items, settings, context))
        .filter(|line| !strip_ansi(line).is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenMetrics;

    fn plain_settings() -> Settings {
        Settings {
            color_level: 0,
            ..Settings::default()
        }
    }

    fn text(id: &str, s: &str) -> WidgetItem {
        WidgetItem {
            custom_text: Some(s.to_string()),
            ..WidgetItem::new(id, "custom-text")
        }
    }

    fn sep(id: &str) -> WidgetItem {
        WidgetItem::new(id, "separator")
    }

    #[test]
    fn test_format_separator() {
        assert_eq!(format_separator("|"), " | ");
        assert_eq!(format_separator("-"), " - ");
        assert_eq!(format_separator(","), ", ");
        assert_eq!(format_separator(" "), " ");
        assert_eq!(format_separator("::"), "::");
    }

    #[test]
    fn test_leading_and_trailing_separators_dropped() {
        let items = vec![sep("0"), text("1", "a"), sep("2"), text("3", "b"), sep("4")];
        let line = render_status_line(&items, &plain_settings(), &RenderContext::default());
        assert_eq!(line, "a | b");
    }

    #[test]
    fn test_merge_seams() {
        let settings = plain_settings();
        let ctx = RenderContext::default();
        let mut a = text("1", "a");
        a.merge = MergeMode::Merge;
        assert_eq!(render_status_line(&[a.clone(), text("2", "b")], &settings, &ctx), "a b");
        a.merge = MergeMode::NoPadding;
        assert_eq!(render_status_line(&[a, text("2", "b")], &settings, &ctx), "ab");
    }

    #[test]
    fn test_default_separator_and_padding() {
        let settings = Settings {
            default_separator: Some("|".into()),
            default_padding: Some(" ".into()),
            ..plain_settings()
        };
        let items = vec![text("1", "a"), sep("2"), text("3", "b")];
        let line = render_status_line(&items, &settings, &RenderContext::default());
        // manual separator suppressed, default separator between padded widgets
        assert_eq!(line, " a  |  b ");
    }

    #[test]
    fn test_hidden_widget_between_separators() {
        let items = vec![
            text("1", "a"),
            sep("2"),
            WidgetItem::new("3", "session-cost"),
            sep("4"),
            text("5", "b"),
        ];
        let line = render_status_line(&items, &plain_settings(), &RenderContext::default());
        assert_eq!(line, "a | b");
    }

    #[test]
    fn test_null_fragment_drops_slot() {
        let items = vec![
            text("1", "a"),
            WidgetItem::new("2", "session-cost"),
            text("3", "b"),
        ];
        let settings = Settings {
            default_separator: Some("-".into()),
            ..plain_settings()
        };
        let line = render_status_line(&items, &settings, &RenderContext::default());
        assert_eq!(line, "a - b");
    }

    #[test]
    fn test_unknown_types_skipped() {
        let items = vec![text("1", "a"), WidgetItem::new("2", "mystery"), text("3", "b")];
        let line = render_status_line(&items, &plain_settings(), &RenderContext::default());
        assert_eq!(line, "ab");
    }

    #[test]
    fn test_flex_fills_width() {
        let settings = Settings {
            flex_mode: FlexMode::Full,
            ..plain_settings()
        };
        let ctx = RenderContext::default().with_terminal_width(Some(10));
        let items = vec![text("1", "ab"), WidgetItem::new("2", "flex-separator"), text("3", "cd")];
        assert_eq!(render_status_line(&items, &settings, &ctx), "ab      cd");

        let items = vec![
            text("1", "a"),
            WidgetItem::new("2", "flex-separator"),
            text("3", "b"),
            WidgetItem::new("4", "flex-separator"),
            text("5", "c"),
        ];
        // 7 free columns: 4 to the first flex, 3 to the second
        assert_eq!(render_status_line(&items, &settings, &ctx), "a    b   c");
    }

    #[test]
    fn test_flex_without_width_acts_as_separator() {
        let items = vec![text("1", "ab"), WidgetItem::new("2", "flex-separator"), text("3", "cd")];
        let line = render_status_line(&items, &plain_settings(), &RenderContext::default());
        assert_eq!(line, "ab | cd");
    }

    #[test]
    fn test_truncates_to_available_width() {
        let settings = Settings {
            flex_mode: FlexMode::FullMinus40,
            ..plain_settings()
        };
        let ctx = RenderContext::default().with_terminal_width(Some(50));
        let line = render_status_line(&[text("1", "abcdefghijklmnop")], &settings, &ctx);
        assert_eq!(line, "abcdefg...");
    }

    #[test]
    fn test_full_until_compact_width() {
        let settings = Settings {
            flex_mode: FlexMode::FullUntilCompact,
            ..plain_settings()
        };
        let mut ctx = RenderContext::default().with_terminal_width(Some(100));
        assert_eq!(available_width(&settings, &ctx), Some(100));
        ctx.token_metrics = Some(TokenMetrics {
            context_length: 150_000,
            ..TokenMetrics::default()
        });
        assert_eq!(available_width(&settings, &ctx), Some(60));
    }

    #[test]
    fn test_powerline_plain_text_layout() {
        let mut settings = plain_settings();
        settings.powerline.enabled = true;
        let mut a = text("1", "a");
        a.background_color = Some("blue".into());
        let mut b = text("2", "b");
        b.background_color = Some("red".into());
        let items = vec![a, sep("s"), WidgetItem::new("f", "flex-separator"), b];
        let line = render_status_line(&items, &settings, &RenderContext::default());
        assert_eq!(line, " a \u{E0B0} b \u{E0B0}");
    }

    #[test]
    fn test_powerline_merge_suppresses_glyph() {
        let mut settings = plain_settings();
        settings.powerline.enabled = true;
        settings.powerline.start_cap = Some("[".into());
        settings.powerline.end_cap = Some("]".into());
        let mut a = text("1", "a");
        a.merge = MergeMode::NoPadding;
        let items = vec![a, text("2", "b")];
        let line = render_status_line(&items, &settings, &RenderContext::default());
        assert_eq!(line, "[ ab ]");
    }

    #[test]
    fn test_render_lines_skips_empty() {
        let settings = Settings {
            lines: vec![vec![text("1", "top")], vec![WidgetItem::new("2", "session-cost")]],
            ..plain_settings()
        };
        assert_eq!(render_lines(&settings, &RenderContext::default()), vec!["top"]);
    }
}

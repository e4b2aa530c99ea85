//! # Widgets Module
//!
//! Every configurable status line widget implements [`Widget`]. The registry
//! maps each [`WidgetKind`] onto a stateless unit struct, so lookups are a
//! single `match` and the registry needs no initialization.
//!
//! Capabilities that only some widgets have (custom editor keybinds, editor
//! actions) are default trait methods that report "nothing to offer".

pub mod catalog;
pub mod custom;
pub mod git;
pub mod info;
pub mod session;
pub mod tokens;

use crate::context::RenderContext;
use crate::models::{Settings, WidgetItem, WidgetKind, FLEX_SEPARATOR, SEPARATOR};

pub use catalog::{
    WidgetCatalogEntry, filter_widget_catalog, get_widget_catalog, get_widget_catalog_categories,
};

/// Label shown for an item in the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDisplay {
    pub display_text: String,
    /// Parenthesized summary of active modifiers, e.g. `(hide 'no git')`
    pub modifier_text: Option<String>,
}

impl EditorDisplay {
    pub fn new(display_text: &str, modifiers: &[&str]) -> Self {
        Self {
            display_text: display_text.to_string(),
            modifier_text: if modifiers.is_empty() {
                None
            } else {
                Some(format!("({})", modifiers.join(", ")))
            },
        }
    }
}

/// A widget-specific editor shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomKeybind {
    pub key: &'static str,
    pub label: &'static str,
    pub action: &'static str,
}

pub trait Widget: Sync {
    fn display_name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn category(&self) -> &'static str {
        "Other"
    }

    fn default_color(&self) -> &'static str;

    fn editor_display(&self, _item: &WidgetItem) -> EditorDisplay {
        EditorDisplay::new(self.display_name(), &[])
    }

    /// Whether the undecorated rendering mode means anything for this widget
    fn supports_raw_value(&self) -> bool {
        true
    }

    fn supports_colors(&self, _item: &WidgetItem) -> bool {
        true
    }

    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &[]
    }

    /// Apply an editor action. `None` means the editor should open a richer
    /// dialog instead of mutating the item directly.
    fn handle_editor_action(&self, _action: &str, _item: &WidgetItem) -> Option<WidgetItem> {
        None
    }

    /// Render the fragment. `None` omits the item from the line; an empty
    /// string still takes part in spacing. Preview contexts never probe.
    fn render(
        &self,
        item: &WidgetItem,
        context: &RenderContext,
        settings: &Settings,
    ) -> Option<String>;
}

/// Registry lookup by kind
pub fn widget_for(kind: WidgetKind) -> &'static dyn Widget {
    match kind {
        WidgetKind::Model => &info::ModelWidget,
        WidgetKind::OutputStyle => &info::OutputStyleWidget,
        WidgetKind::GitBranch => &git::GitBranchWidget,
        WidgetKind::GitChanges => &git::GitChangesWidget,
        WidgetKind::GitRootDir => &git::GitRootDirWidget,
        WidgetKind::GitWorktree => &git::GitWorktreeWidget,
        WidgetKind::CurrentWorkingDir => &info::CurrentWorkingDirWidget,
        WidgetKind::TokensInput => &tokens::TokensInputWidget,
        WidgetKind::TokensOutput => &tokens::TokensOutputWidget,
        WidgetKind::TokensCached => &tokens::TokensCachedWidget,
        WidgetKind::TokensTotal => &tokens::TokensTotalWidget,
        WidgetKind::ContextLength => &tokens::ContextLengthWidget,
        WidgetKind::ContextPercentage => &tokens::ContextPercentageWidget,
        WidgetKind::ContextPercentageUsable => &tokens::ContextPercentageUsableWidget,
        WidgetKind::SessionClock => &session::SessionClockWidget,
        WidgetKind::SessionCost => &session::SessionCostWidget,
        WidgetKind::BlockTimer => &session::BlockTimerWidget,
        WidgetKind::TerminalWidth => &info::TerminalWidthWidget,
        WidgetKind::Version => &info::VersionWidget,
        WidgetKind::CustomText => &custom::CustomTextWidget,
        WidgetKind::CustomCommand => &custom::CustomCommandWidget,
        WidgetKind::ClaudeSessionId => &session::ClaudeSessionIdWidget,
        WidgetKind::SessionName => &session::SessionNameWidget,
    }
}

/// Registry lookup by type string; `None` for layout and unknown types
pub fn get_widget(kind: &str) -> Option<&'static dyn Widget> {
    WidgetKind::parse(kind).map(widget_for)
}

/// Registry types in declaration order, plus the layout types the settings allow
pub fn get_all_widget_types(settings: &Settings) -> Vec<&'static str> {
    let mut types: Vec<&'static str> = WidgetKind::ALL.iter().map(|k| k.as_str()).collect();
    if !settings.powerline.enabled {
        if settings.default_separator().is_none() {
            types.push(SEPARATOR);
        }
        types.push(FLEX_SEPARATOR);
    }
    types
}

pub fn is_known_widget_type(kind: &str) -> bool {
    kind == SEPARATOR || kind == FLEX_SEPARATOR || WidgetKind::parse(kind).is_some()
}

/// `value` alone in raw mode, otherwise `label` + `value`
pub(crate) fn labeled(item: &WidgetItem, label: &str, value: &str) -> String {
    if item.is_raw() {
        value.to_string()
    } else {
        format!("{label}{value}")
    }
}

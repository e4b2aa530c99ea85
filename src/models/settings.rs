use serde::{Deserialize, Serialize};

use super::item::{WidgetItem, SEPARATOR};

/// Powerline glyph drawn between segments (U+E0B0)
pub const DEFAULT_POWERLINE_SEPARATOR: &str = "\u{E0B0}";

/// Theme name that disables automatic background assignment
pub const CUSTOM_THEME: &str = "custom";

/// How much of the terminal width flex separators may fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexMode {
    #[serde(rename = "full")]
    Full,
    /// Leave 40 columns for the host's own right-hand notices
    #[default]
    #[serde(rename = "full-minus-40")]
    FullMinus40,
    /// Full width until context usage reaches `compact_threshold`
    #[serde(rename = "full-until-compact")]
    FullUntilCompact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PowerlineSettings {
    pub enabled: bool,
    pub theme: String,
    pub separator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_cap: Option<String>,
}

impl Default for PowerlineSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            theme: CUSTOM_THEME.to_string(),
            separator: DEFAULT_POWERLINE_SEPARATOR.to_string(),
            start_cap: None,
            end_cap: None,
        }
    }
}

impl PowerlineSettings {
    /// Backgrounds are picked automatically only for non-custom powerline themes
    pub fn auto_backgrounds(&self) -> bool {
        self.enabled && self.theme != CUSTOM_THEME
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub version: u32,
    pub lines: Vec<Vec<WidgetItem>>,
    pub flex_mode: FlexMode,
    /// Context percentage at which `full-until-compact` starts reserving space
    pub compact_threshold: u8,
    /// 0 = no color, 1 = basic ANSI, 2 = 256 colors, 3 = truecolor
    pub color_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_padding: Option<String>,
    pub global_bold: bool,
    pub powerline: PowerlineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let line = vec![
            WidgetItem::new("1", "model"),
            WidgetItem::new("2", SEPARATOR),
            WidgetItem::new("3", "context-length"),
            WidgetItem::new("4", SEPARATOR),
            WidgetItem::new("5", "git-branch"),
            WidgetItem::new("6", SEPARATOR),
            WidgetItem::new("7", "git-changes"),
        ];
        Self {
            version: 3,
            lines: vec![line],
            flex_mode: FlexMode::default(),
            compact_threshold: 60,
            color_level: 2,
            default_separator: None,
            default_padding: None,
            global_bold: false,
            powerline: PowerlineSettings::default(),
        }
    }
}

impl Settings {
    /// A configured default separator, ignoring empty strings
    pub fn default_separator(&self) -> Option<&str> {
        self.default_separator.as_deref().filter(|s| !s.is_empty())
    }

    pub fn padding(&self) -> &str {
        self.default_padding.as_deref().unwrap_or("")
    }

    /// Manual separators are allowed only without powerline and without a default separator
    pub fn manual_separators_allowed(&self) -> bool {
        !self.powerline.enabled && self.default_separator().is_none()
    }

    pub fn flex_separators_allowed(&self) -> bool {
        !self.powerline.enabled
    }
}

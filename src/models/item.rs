use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Type string of the manual separator pseudo-widget
pub const SEPARATOR: &str = "separator";

/// Type string of the flex separator pseudo-widget
pub const FLEX_SEPARATOR: &str = "flex-separator";

/// Default glyph rendered by a manual separator
pub const DEFAULT_SEPARATOR_CHAR: &str = "|";

/// Concrete widget types, in registry declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Model,
    OutputStyle,
    GitBranch,
    GitChanges,
    GitRootDir,
    GitWorktree,
    CurrentWorkingDir,
    TokensInput,
    TokensOutput,
    TokensCached,
    TokensTotal,
    ContextLength,
    ContextPercentage,
    ContextPercentageUsable,
    SessionClock,
    SessionCost,
    BlockTimer,
    TerminalWidth,
    Version,
    CustomText,
    CustomCommand,
    ClaudeSessionId,
    SessionName,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 23] = [
        Self::Model,
        Self::OutputStyle,
        Self::GitBranch,
        Self::GitChanges,
        Self::GitRootDir,
        Self::GitWorktree,
        Self::CurrentWorkingDir,
        Self::TokensInput,
        Self::TokensOutput,
        Self::TokensCached,
        Self::TokensTotal,
        Self::ContextLength,
        Self::ContextPercentage,
        Self::ContextPercentageUsable,
        Self::SessionClock,
        Self::SessionCost,
        Self::BlockTimer,
        Self::TerminalWidth,
        Self::Version,
        Self::CustomText,
        Self::CustomCommand,
        Self::ClaudeSessionId,
        Self::SessionName,
    ];

    /// Parse a widget type string
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::OutputStyle => "output-style",
            Self::GitBranch => "git-branch",
            Self::GitChanges => "git-changes",
            Self::GitRootDir => "git-root-dir",
            Self::GitWorktree => "git-worktree",
            Self::CurrentWorkingDir => "current-working-dir",
            Self::TokensInput => "tokens-input",
            Self::TokensOutput => "tokens-output",
            Self::TokensCached => "tokens-cached",
            Self::TokensTotal => "tokens-total",
            Self::ContextLength => "context-length",
            Self::ContextPercentage => "context-percentage",
            Self::ContextPercentageUsable => "context-percentage-usable",
            Self::SessionClock => "session-clock",
            Self::SessionCost => "session-cost",
            Self::BlockTimer => "block-timer",
            Self::TerminalWidth => "terminal-width",
            Self::Version => "version",
            Self::CustomText => "custom-text",
            Self::CustomCommand => "custom-command",
            Self::ClaudeSessionId => "claude-session-id",
            Self::SessionName => "session-name",
        }
    }

    /// Whether rendering this widget needs data parsed from the session transcript
    pub fn needs_transcript(&self) -> bool {
        matches!(
            self,
            Self::TokensInput
                | Self::TokensOutput
                | Self::TokensCached
                | Self::TokensTotal
                | Self::ContextLength
                | Self::ContextPercentage
                | Self::ContextPercentageUsable
                | Self::SessionClock
                | Self::SessionName
        )
    }
}

/// What a configured item's `type` string resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Widget(WidgetKind),
    Separator,
    FlexSeparator,
    Unknown,
}

impl ItemKind {
    pub fn parse(s: &str) -> Self {
        match s {
            SEPARATOR => Self::Separator,
            FLEX_SEPARATOR => Self::FlexSeparator,
            other => WidgetKind::parse(other).map_or(Self::Unknown, Self::Widget),
        }
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, Self::Separator | Self::FlexSeparator)
    }
}

/// How an item joins the item rendered after it.
///
/// Serialized as absent (`None`), `true` (`Merge`) or `"no-padding"` (`NoPadding`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    None,
    Merge,
    NoPadding,
}

impl MergeMode {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Editor cycling order: none -> merge -> no-padding -> none
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Merge,
            Self::Merge => Self::NoPadding,
            Self::NoPadding => Self::None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMerge {
    Flag(bool),
    Mode(String),
}

impl Serialize for MergeMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_bool(false),
            Self::Merge => serializer.serialize_bool(true),
            Self::NoPadding => serializer.serialize_str("no-padding"),
        }
    }
}

impl<'de> Deserialize<'de> for MergeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawMerge>::deserialize(deserializer)? {
            Some(RawMerge::Flag(true)) => Self::Merge,
            Some(RawMerge::Mode(m)) if m == "no-padding" => Self::NoPadding,
            _ => Self::None,
        })
    }
}

/// A configured instance placed on a status line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(skip_serializing_if = "MergeMode::is_none")]
    pub merge: MergeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_colors: Option<bool>,
    /// Custom command timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl WidgetItem {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn item_kind(&self) -> ItemKind {
        ItemKind::parse(&self.kind)
    }

    pub fn is_raw(&self) -> bool {
        self.raw_value.unwrap_or(false)
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key).map(String::as_str)
    }

    /// True when the metadata value is the literal string "true"
    pub fn meta_flag(&self, key: &str) -> bool {
        self.meta(key) == Some("true")
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Copy of the item with a boolean metadata flag flipped
    pub fn toggled_flag(&self, key: &str) -> Self {
        let current = self.meta_flag(key);
        self.clone().with_meta(key, (!current).to_string())
    }

    /// Separator glyph, falling back to `|`
    pub fn separator_char(&self) -> &str {
        self.character.as_deref().unwrap_or(DEFAULT_SEPARATOR_CHAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_mode_deserialize() {
        let item: WidgetItem =
            serde_json::from_str(r#"{"id":"1","type":"model","merge":true}"#).unwrap();
        assert_eq!(item.merge, MergeMode::Merge);

        let item: WidgetItem =
            serde_json::from_str(r#"{"id":"1","type":"model","merge":"no-padding"}"#).unwrap();
        assert_eq!(item.merge, MergeMode::NoPadding);

        let item: WidgetItem = serde_json::from_str(r#"{"id":"1","type":"model"}"#).unwrap();
        assert_eq!(item.merge, MergeMode::None);

        let item: WidgetItem =
            serde_json::from_str(r#"{"id":"1","type":"model","merge":false}"#).unwrap();
        assert_eq!(item.merge, MergeMode::None);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let item = WidgetItem::new("a", "git-branch").with_meta("hideNoGit", "true");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "git-branch");
        assert_eq!(json["metadata"]["hideNoGit"], "true");
        assert!(json.get("merge").is_none());
        assert!(json.get("rawValue").is_none());
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!(ItemKind::parse("separator"), ItemKind::Separator);
        assert_eq!(ItemKind::parse("flex-separator"), ItemKind::FlexSeparator);
        assert_eq!(
            ItemKind::parse("git-worktree"),
            ItemKind::Widget(WidgetKind::GitWorktree)
        );
        assert_eq!(ItemKind::parse("nope"), ItemKind::Unknown);
    }

    #[test]
    fn test_kind_strings_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::parse(kind.as_str()), Some(kind));
        }
    }
}

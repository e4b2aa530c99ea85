//! Widgets backed by the git probe.
//!
//! All four share the same no-repository policy: outside a work tree (or when
//! the specific lookup fails) they render a "no git" text, or nothing at all
//! when the item's `hideNoGit` flag is set.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CustomKeybind, EditorDisplay, Widget};
use crate::context::RenderContext;
use crate::git::{is_inside_work_tree, run_git};
use crate::models::{Settings, WidgetItem};

pub const HIDE_NO_GIT: &str = "hideNoGit";
pub const TOGGLE_NO_GIT: &str = "toggle-nogit";

const BRANCH_ICON: &str = "⎇ ";
const WORKTREE_ICON: &str = "𖠰 ";
const WORKTREE_MARKER: &str = ".git/worktrees/";

static INSERTIONS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) insertion").unwrap());
static DELETIONS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) deletion").unwrap());

static NO_GIT_KEYBINDS: [CustomKeybind; 1] = [CustomKeybind {
    key: "h",
    label: "(h)ide 'no git' message",
    action: TOGGLE_NO_GIT,
}];

fn no_git_display(name: &str, item: &WidgetItem) -> EditorDisplay {
    if item.meta_flag(HIDE_NO_GIT) {
        EditorDisplay::new(name, &["hide 'no git'"])
    } else {
        EditorDisplay::new(name, &[])
    }
}

fn toggle_no_git(action: &str, item: &WidgetItem) -> Option<WidgetItem> {
    (action == TOGGLE_NO_GIT).then(|| item.toggled_flag(HIDE_NO_GIT))
}

fn no_git(item: &WidgetItem, text: &str) -> Option<String> {
    if item.meta_flag(HIDE_NO_GIT) {
        None
    } else {
        Some(text.to_string())
    }
}

fn with_icon(item: &WidgetItem, icon: &str, value: &str) -> String {
    if item.is_raw() {
        value.to_string()
    } else {
        format!("{icon}{value}")
    }
}

pub struct GitBranchWidget;

impl Widget for GitBranchWidget {
    fn display_name(&self) -> &'static str {
        "Git Branch"
    }
    fn description(&self) -> &'static str {
        "Shows the current git branch name"
    }
    fn category(&self) -> &'static str {
        "Git"
    }
    fn default_color(&self) -> &'static str {
        "magenta"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        no_git_display(self.display_name(), item)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &NO_GIT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        toggle_no_git(action, item)
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(with_icon(item, BRANCH_ICON, "main"));
        }
        if !is_inside_work_tree(context) {
            return no_git(item, "⎇ no git");
        }
        match run_git(&["branch", "--show-current"], context) {
            Some(branch) => Some(with_icon(item, BRANCH_ICON, &branch)),
            None => no_git(item, "⎇ no git"),
        }
    }
}

/// Insertions and deletions from `git diff --shortstat` output; missing counts are 0
pub fn parse_shortstat(stat: &str) -> (u64, u64) {
    let count = |re: &Regex| {
        re.captures(stat)
            .and_then(|c| c[1].parse::<u64>().ok())
            .unwrap_or(0)
    };
    (count(&INSERTIONS_RE), count(&DELETIONS_RE))
}

pub struct GitChangesWidget;

impl Widget for GitChangesWidget {
    fn display_name(&self) -> &'static str {
        "Git Changes"
    }
    fn description(&self) -> &'static str {
        "Shows git changes count (+insertions, -deletions)"
    }
    fn category(&self) -> &'static str {
        "Git"
    }
    fn default_color(&self) -> &'static str {
        "yellow"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        no_git_display(self.display_name(), item)
    }
    fn supports_raw_value(&self) -> bool {
        false
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &NO_GIT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        toggle_no_git(action, item)
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some("(+42,-10)".to_string());
        }
        if !is_inside_work_tree(context) {
            return no_git(item, "(no git)");
        }
        let unstaged = run_git(&["diff", "--shortstat"], context).unwrap_or_default();
        let staged = run_git(&["diff", "--cached", "--shortstat"], context).unwrap_or_default();
        let (ins_a, del_a) = parse_shortstat(&unstaged);
        let (ins_b, del_b) = parse_shortstat(&staged);
        Some(format!("(+{},-{})", ins_a + ins_b, del_a + del_b))
    }
}

/// Final path segment of a repository root, tolerating `\` separators and roots
pub fn root_dir_name(root: &str) -> String {
    let trimmed = root.trim_end_matches(['/', '\\']);
    let normalized = if trimmed.is_empty() { root } else { trimmed };
    normalized
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .last()
        .unwrap_or(normalized)
        .to_string()
}

pub struct GitRootDirWidget;

impl Widget for GitRootDirWidget {
    fn display_name(&self) -> &'static str {
        "Git Root Dir"
    }
    fn description(&self) -> &'static str {
        "Shows the git repository root directory name"
    }
    fn category(&self) -> &'static str {
        "Git"
    }
    fn default_color(&self) -> &'static str {
        "cyan"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        no_git_display(self.display_name(), item)
    }
    fn supports_raw_value(&self) -> bool {
        false
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &NO_GIT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        toggle_no_git(action, item)
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some("my-repo".to_string());
        }
        if !is_inside_work_tree(context) {
            return no_git(item, "no git");
        }
        match run_git(&["rev-parse", "--show-toplevel"], context) {
            Some(root) => Some(root_dir_name(&root)),
            None => no_git(item, "no git"),
        }
    }
}

/// Worktree name from `git rev-parse --git-dir` output
pub fn worktree_name(git_dir: &str) -> Option<String> {
    let normalized = git_dir.replace('\\', "/");
    if normalized.ends_with("/.git") || normalized == ".git" {
        return Some("main".to_string());
    }
    let idx = normalized.rfind(WORKTREE_MARKER)?;
    let name = &normalized[idx + WORKTREE_MARKER.len()..];
    (!name.is_empty()).then(|| name.to_string())
}

pub struct GitWorktreeWidget;

impl Widget for GitWorktreeWidget {
    fn display_name(&self) -> &'static str {
        "Git Worktree"
    }
    fn description(&self) -> &'static str {
        "Shows the current git worktree name"
    }
    fn category(&self) -> &'static str {
        "Git"
    }
    fn default_color(&self) -> &'static str {
        "blue"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        no_git_display(self.display_name(), item)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &NO_GIT_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        toggle_no_git(action, item)
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        if context.is_preview {
            return Some(with_icon(item, WORKTREE_ICON, "main"));
        }
        if !is_inside_work_tree(context) {
            return no_git(item, "𖠰 no git");
        }
        match run_git(&["rev-parse", "--git-dir"], context).and_then(|dir| worktree_name(&dir)) {
            Some(name) => Some(with_icon(item, WORKTREE_ICON, &name)),
            None => no_git(item, "𖠰 no git"),
        }
    }
}

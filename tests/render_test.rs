mod common;

use std::sync::Arc;

use ccstatusline::config::read_settings;
use ccstatusline::context::RenderContext;
use ccstatusline::render::{render_lines, render_status_line};
use ccstatusline::utils::strip_ansi;
use common::{ScriptedGit, git_context};
use tempfile::TempDir;

const SETTINGS_JSON: &str = r#"{
    "version": 3,
    "lines": [
        [
            { "id": "1", "type": "git-branch", "color": "magenta" },
            { "id": "2", "type": "separator" },
            { "id": "3", "type": "git-changes", "color": "yellow" }
        ],
        [],
        [
            { "id": "4", "type": "custom-text", "customText": "hello", "merge": true },
            { "id": "5", "type": "no-such-widget" },
            { "id": "6", "type": "custom-text", "customText": "world" }
        ]
    ],
    "colorLevel": 0
}"#;

fn settings_from_file() -> ccstatusline::models::Settings {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, SETTINGS_JSON).unwrap();
    read_settings(&path).unwrap()
}

#[test]
fn test_git_line_end_to_end() {
    let settings = settings_from_file();
    let git = Arc::new(ScriptedGit::new(&[
        Some("true\n"),
        Some("feature/worktree\n"),
        Some("true\n"),
        Some(""),
        Some(""),
    ]));
    let ctx = git_context(git.clone());

    let line = render_status_line(&settings.lines[0], &settings, &ctx);
    assert_eq!(strip_ansi(&line), "⎇ feature/worktree | (+0,-0)");
    assert!(git.calls().iter().all(|(_, cwd)| cwd.as_deref() == Some("/work")));
}

#[test]
fn test_render_lines_skips_empty_lines() {
    let settings = settings_from_file();
    let ctx = git_context(Arc::new(ScriptedGit::new(&[]).with_fallback("")));

    let lines: Vec<String> = render_lines(&settings, &ctx)
        .iter()
        .map(|l| strip_ansi(l))
        .collect();
    // outside a repository the git line still reports "no git"
    assert_eq!(lines, ["⎇ no git | (no git)", "hello world"]);
}

#[test]
fn test_preview_renders_without_session() {
    let settings = settings_from_file();
    let lines = render_lines(&settings, &RenderContext::preview());
    assert_eq!(strip_ansi(&lines[0]), "⎇ main | (+42,-10)");
}

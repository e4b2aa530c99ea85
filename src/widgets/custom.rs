//! User-defined widgets: fixed text and external commands.

use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CustomKeybind, EditorDisplay, Widget};
use crate::context::RenderContext;
use crate::models::{Settings, WidgetItem};
use crate::utils::{strip_ansi, truncate_to_width};

const EDIT: &str = "edit";
const TOGGLE_PRESERVE: &str = "toggle-preserve";

/// Used when an item does not set `timeout`
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 1000;

static TEXT_KEYBINDS: [CustomKeybind; 1] = [CustomKeybind {
    key: "e",
    label: "(e)dit text",
    action: EDIT,
}];

static COMMAND_KEYBINDS: [CustomKeybind; 2] = [
    CustomKeybind {
        key: "e",
        label: "(e)dit cmd",
        action: EDIT,
    },
    CustomKeybind {
        key: "p",
        label: "(p)reserve colors",
        action: TOGGLE_PRESERVE,
    },
];

pub struct CustomTextWidget;

impl Widget for CustomTextWidget {
    fn display_name(&self) -> &'static str {
        "Custom Text"
    }
    fn description(&self) -> &'static str {
        "Displays user-defined custom text"
    }
    fn category(&self) -> &'static str {
        "Custom"
    }
    fn default_color(&self) -> &'static str {
        "white"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        match item.custom_text.as_deref().filter(|t| !t.is_empty()) {
            Some(text) => EditorDisplay::new(self.display_name(), &[&format!("\"{text}\"")]),
            None => EditorDisplay::new(self.display_name(), &["empty"]),
        }
    }
    fn supports_raw_value(&self) -> bool {
        false
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &TEXT_KEYBINDS
    }

    fn render(&self, item: &WidgetItem, _: &RenderContext, _: &Settings) -> Option<String> {
        Some(item.custom_text.clone().unwrap_or_default())
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Run `command` through the shell with `input` on stdin; stdout on success
pub fn run_command(command: &str, input: &str, timeout: Duration) -> Result<String> {
    let mut child = shell(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn: {command}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        // A command that ignores stdin may already have exited
        let _ = stdin.write_all(input.as_bytes());
    }
    let mut stdout = child.stdout.take().context("stdout not captured")?;
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = stdout.read_to_string(&mut buf);
        buf
    });

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            let output = reader.join().unwrap_or_default();
            if !status.success() {
                bail!("`{command}` exited with {status}");
            }
            return Ok(output);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            bail!("`{command}` timed out after {}ms", timeout.as_millis());
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

pub struct CustomCommandWidget;

impl Widget for CustomCommandWidget {
    fn display_name(&self) -> &'static str {
        "Custom Command"
    }
    fn description(&self) -> &'static str {
        "Executes a shell command and displays its output"
    }
    fn category(&self) -> &'static str {
        "Custom"
    }
    fn default_color(&self) -> &'static str {
        "white"
    }
    fn editor_display(&self, item: &WidgetItem) -> EditorDisplay {
        let mut modifiers = Vec::new();
        if let Some(cmd) = item.command_path.as_deref().filter(|c| !c.is_empty()) {
            modifiers.push(truncate_to_width(cmd, 20));
        }
        if item.preserve_colors.unwrap_or(false) {
            modifiers.push("preserve colors".to_string());
        }
        let refs: Vec<&str> = modifiers.iter().map(String::as_str).collect();
        EditorDisplay::new(self.display_name(), &refs)
    }
    fn supports_raw_value(&self) -> bool {
        false
    }
    /// Command output keeps its own colors when `preserve_colors` is set
    fn supports_colors(&self, item: &WidgetItem) -> bool {
        !item.preserve_colors.unwrap_or(false)
    }
    fn custom_keybinds(&self) -> &'static [CustomKeybind] {
        &COMMAND_KEYBINDS
    }
    fn handle_editor_action(&self, action: &str, item: &WidgetItem) -> Option<WidgetItem> {
        match action {
            TOGGLE_PRESERVE => Some(WidgetItem {
                preserve_colors: Some(!item.preserve_colors.unwrap_or(false)),
                ..item.clone()
            }),
            _ => None,
        }
    }

    fn render(&self, item: &WidgetItem, context: &RenderContext, _: &Settings) -> Option<String> {
        let command = item.command_path.as_deref().filter(|c| !c.trim().is_empty())?;
        if context.is_preview {
            return Some(format!("[cmd: {}]", truncate_to_width(command, 20)));
        }
        let input = context
            .data
            .as_ref()
            .and_then(|d| serde_json::to_string(d).ok())
            .unwrap_or_else(|| "{}".to_string());
        let timeout = Duration::from_millis(item.timeout.unwrap_or(DEFAULT_COMMAND_TIMEOUT_MS));

        let output = match run_command(command, &input, timeout) {
            Ok(out) => out,
            Err(err) => {
                debug!("custom command failed: {err:#}");
                return None;
            }
        };
        let mut output = output.trim_end().to_string();
        if !item.preserve_colors.unwrap_or(false) {
            output = strip_ansi(&output);
        }
        if output.is_empty() {
            return None;
        }
        Some(match item.max_width {
            Some(max) if max > 0 => truncate_to_width(&output, max),
            _ => output,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn command_item(cmd: &str) -> WidgetItem {
        WidgetItem {
            command_path: Some(cmd.to_string()),
            ..WidgetItem::new("1", "custom-command")
        }
    }

    #[test]
    fn test_custom_text_renders_verbatim() {
        let item = WidgetItem {
            custom_text: Some("hello".into()),
            ..WidgetItem::new("1", "custom-text")
        };
        let out = CustomTextWidget.render(&item, &RenderContext::default(), &Settings::default());
        assert_eq!(out.as_deref(), Some("hello"));
        let empty = WidgetItem::new("2", "custom-text");
        let out = CustomTextWidget.render(&empty, &RenderContext::default(), &Settings::default());
        assert_eq!(out.as_deref(), Some(""));
        assert!(CustomTextWidget.handle_editor_action("edit", &item).is_none());
    }

    #[test]
    fn test_command_output_stripped_and_truncated() {
        let mut item = command_item("printf '\\033[31mhello world\\033[0m\\n'");
        let ctx = RenderContext::default();
        let settings = Settings::default();
        assert_eq!(
            CustomCommandWidget.render(&item, &ctx, &settings).as_deref(),
            Some("hello world")
        );
        item.max_width = Some(8);
        assert_eq!(
            CustomCommandWidget.render(&item, &ctx, &settings).as_deref(),
            Some("hello...")
        );
    }

    #[test]
    fn test_command_reads_session_json() {
        let item = command_item("cat");
        let ctx = RenderContext::with_data(
            serde_json::from_str(r#"{"session_id":"abc"}"#).unwrap(),
        );
        let out = CustomCommandWidget
            .render(&item, &ctx, &Settings::default())
            .unwrap();
        assert!(out.contains("\"session_id\":\"abc\""));
    }

    #[test]
    fn test_command_failure_and_timeout_render_nothing() {
        let ctx = RenderContext::default();
        let settings = Settings::default();
        assert_eq!(CustomCommandWidget.render(&command_item("exit 3"), &ctx, &settings), None);

        let slow = WidgetItem {
            timeout: Some(50),
            ..command_item("sleep 2; echo late")
        };
        assert_eq!(CustomCommandWidget.render(&slow, &ctx, &settings), None);
    }
}

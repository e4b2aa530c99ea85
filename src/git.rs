//! # Git Module
//!
//! Runs `git` queries against the session's working directory.
//!
//! Every probe is a blocking child process with stderr discarded; failures of
//! any kind (spawn error, non-zero exit, empty output) come back as `None`.

use std::process::{Command, Stdio};

use crate::context::RenderContext;

/// Executes `git` with the given arguments.
///
/// Implementations return the raw stdout of a successful run and `None` when
/// the process could not be started or exited non-zero.
pub trait GitRunner {
    fn run(&self, args: &[&str], cwd: Option<&str>) -> Option<String>;
}

/// Runs the real `git` binary found on `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str], cwd: Option<&str>) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let output = cmd.output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// First non-blank of `cwd`, `workspace.current_dir`, `workspace.project_dir`
pub fn resolve_working_directory(context: &RenderContext) -> Option<&str> {
    let data = context.data.as_ref()?;
    [data.cwd.as_deref(), data.current_dir(), data.project_dir()]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
}

/// Run a git query in the resolved directory; trimmed stdout, or `None` when empty or failed
pub fn run_git(args: &[&str], context: &RenderContext) -> Option<String> {
    let cwd = resolve_working_directory(context);
    let output = context.git.run(args, cwd)?;
    let trimmed = output.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_inside_work_tree(context: &RenderContext) -> bool {
    run_git(&["rev-parse", "--is-inside-work-tree"], context).as_deref() == Some("true")
}

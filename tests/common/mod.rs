#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ccstatusline::context::RenderContext;
use ccstatusline::git::GitRunner;
use ccstatusline::models::StatusJson;

/// Replays canned git output in call order and records every invocation
pub struct ScriptedGit {
    responses: Mutex<VecDeque<Option<String>>>,
    fallback: Option<String>,
    calls: Mutex<Vec<(Vec<String>, Option<String>)>>,
}

impl ScriptedGit {
    pub fn new(responses: &[Option<&str>]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.map(str::to_string)).collect()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call the script does not cover with `output`
    pub fn with_fallback(mut self, output: &str) -> Self {
        self.fallback = Some(output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(Vec<String>, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str], cwd: Option<&str>) -> Option<String> {
        self.calls.lock().unwrap().push((
            args.iter().map(|a| a.to_string()).collect(),
            cwd.map(str::to_string),
        ));
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => self.fallback.clone(),
        }
    }
}

pub fn status(value: serde_json::Value) -> StatusJson {
    serde_json::from_value(value).unwrap()
}

/// Live (non-preview) context running in `/work` against a scripted git
pub fn git_context(git: Arc<ScriptedGit>) -> RenderContext {
    RenderContext::with_data(status(serde_json::json!({ "cwd": "/work" }))).with_git(git)
}

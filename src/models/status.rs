use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusWorkspace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct OutputStyle {
    pub name: String,
}

/// Cost summary provided by the host CLI
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusCost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines_added: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines_removed: Option<i64>,
}

/// Session JSON piped to the status line command on stdin.
///
/// Every field is optional; unknown fields are kept so the payload can be
/// forwarded verbatim to custom commands.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<StatusModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<StatusWorkspace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_style: Option<OutputStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<StatusCost>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusJson {
    pub fn model_id(&self) -> Option<&str> {
        self.model.as_ref()?.id.as_deref()
    }

    pub fn model_display_name(&self) -> Option<&str> {
        let model = self.model.as_ref()?;
        model.display_name.as_deref().or(model.id.as_deref())
    }

    pub fn current_dir(&self) -> Option<&str> {
        self.workspace.as_ref()?.current_dir.as_deref()
    }

    pub fn project_dir(&self) -> Option<&str> {
        self.workspace.as_ref()?.project_dir.as_deref()
    }
}

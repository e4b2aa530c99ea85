use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(default)]
pub struct MessageUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub cache_read_input_tokens: u64,
}

#[derive(Deserialize, Debug)]
pub struct MessageObj {
    pub usage: Option<MessageUsage>,
}

/// One JSON line of a session transcript; only the fields the status line reads
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    pub r#type: Option<String>,
    pub message: Option<MessageObj>,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub is_sidechain: bool,
    pub summary: Option<String>,
}

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/jobs`.
#[derive(Clone, Debug, Serialize)]
pub struct JobRequest {
    pub model: String,
    pub kind: JobKind,
    pub prompt: Prompt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Text,
    Image,
}

/// Structured prompt: fixed system role, task instructions and the data they apply to.
#[derive(Clone, Debug, Serialize)]
pub struct Prompt {
    pub system: String,
    pub instructions: String,
    pub context: serde_json::Value,
}

/// Job document returned by both submission and status endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<JobOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    /// Status values this client does not know yet; treated as still in progress
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobOutput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<InlineImage>,
}

/// Base64 encoded image payload.
#[derive(Clone, Debug, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

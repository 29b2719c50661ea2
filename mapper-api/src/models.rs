use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// Raw log text.
    pub data: Option<String>,
    /// Game version whose mappings should be applied.
    pub version: Option<String>,
    /// Accepted for client compatibility; paste upload is not performed.
    pub hastebin: Option<bool>,
}

impl SubmitRequest {
    /// The log text, if it has any non-whitespace content.
    pub fn log(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.trim().is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionsResponse {
    pub versions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub versions: usize,
}

use serde::{Deserialize, Serialize};
use crate::models::{PageRequest, Policy, DEFAULT_PAGE_SIZE};

#[derive(Deserialize)]
pub struct PolicyListQuery {
    pub policy: Policy,
    pub current: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

impl PolicyListQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.current.unwrap_or(1), self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<&'static str>,
    pub alerts: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

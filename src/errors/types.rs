use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The backend answered but refused the request.
    #[error("Gateway rejected request: {0}")]
    Gateway(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AlertDeskError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AlertDeskError::Timeout(e.to_string())
        } else if e.is_decode() {
            AlertDeskError::Gateway(format!("Invalid response body: {}", e))
        } else {
            AlertDeskError::Network(e.to_string())
        }
    }
}

use std::path::Path;
use crate::errors::AlertDeskError;
use super::types::{ConsoleConfig, GatewayMode};
use super::security::validate_endpoints;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;
/// Toasts older than a day are noise.
pub const MAX_NOTIFICATION_TTL_SECS: i64 = 86_400;

pub async fn parse_config(path: &Path) -> Result<ConsoleConfig, AlertDeskError> {
    if !path.exists() {
        return Err(AlertDeskError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(AlertDeskError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Same checks as [`parse_config`] on an in-memory document.
pub fn parse_config_str(content: &str) -> Result<ConsoleConfig, AlertDeskError> {
    if content.trim().is_empty() {
        return Ok(ConsoleConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: ConsoleConfig = serde_yaml::from_value(yaml)?;
    validate_endpoints(&config)?;
    validate_conflicts(&config)?;

    Ok(config)
}

/// Parse `path` when given, otherwise fall back to defaults.
pub async fn load_or_default(path: Option<&Path>) -> Result<ConsoleConfig, AlertDeskError> {
    match path {
        Some(p) => parse_config(p).await,
        None => {
            debug!("No config file given, using defaults");
            Ok(ConsoleConfig::default())
        }
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), AlertDeskError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| AlertDeskError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| AlertDeskError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        // advisory only; hard limits are enforced in validate_conflicts
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &ConsoleConfig) -> Result<(), AlertDeskError> {
    if !(0.0..=1.0).contains(&config.mock.failure_rate) {
        return Err(AlertDeskError::Config(format!(
            "mock.failure_rate must be between 0 and 1, got {}",
            config.mock.failure_rate
        )));
    }

    if config.gateway.mode == GatewayMode::Http {
        let has_url = config.gateway.base_url.as_deref().map_or(false, |u| !u.trim().is_empty());
        if !has_url {
            return Err(AlertDeskError::Config("gateway.mode is http but gateway.base_url is not set".into()));
        }
    } else if config.gateway.base_url.is_some() {
        warn!("gateway.base_url is ignored in mock mode");
    }

    if config.pagination.page_size == 0 {
        return Err(AlertDeskError::Config("pagination.page_size must be greater than 0".into()));
    }

    if !(1..=MAX_NOTIFICATION_TTL_SECS).contains(&config.notifications.ttl_secs) {
        return Err(AlertDeskError::Config(format!(
            "notifications.ttl_secs must be between 1 and {}, got {}",
            MAX_NOTIFICATION_TTL_SECS, config.notifications.ttl_secs
        )));
    }

    if config.gateway.timeout_secs == 0 {
        return Err(AlertDeskError::Config("gateway.timeout_secs must be greater than 0".into()));
    }

    Ok(())
}

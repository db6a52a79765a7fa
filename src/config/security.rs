use std::path::{Component, Path};
use reqwest::Url;
use crate::errors::AlertDeskError;
use super::types::ConsoleConfig;

/// Check the settings that end up in file opens or outgoing requests:
/// `session.path`, `server.db`, `server.host` and `gateway.base_url`.
pub fn validate_endpoints(config: &ConsoleConfig) -> Result<(), AlertDeskError> {
    check_local_path("session.path", &config.session.path)?;
    check_local_path("server.db", &config.server.db)?;
    check_host("server.host", &config.server.host)?;
    if let Some(url) = &config.gateway.base_url {
        check_base_url("gateway.base_url", url)?;
    }
    Ok(())
}

fn rejected(key: &str, reason: impl std::fmt::Display) -> AlertDeskError {
    AlertDeskError::Config(format!("{}: {}", key, reason))
}

/// A plain filesystem path: no URI scheme, no `..` components, no control characters.
pub fn check_local_path(key: &str, value: &str) -> Result<(), AlertDeskError> {
    if value.trim().is_empty() {
        return Err(rejected(key, "must not be empty"));
    }
    if value.chars().any(char::is_control) {
        return Err(rejected(key, "contains control characters"));
    }
    if value.contains("://") || value.to_ascii_lowercase().starts_with("file:") {
        return Err(rejected(key, format!("expected a file path, got URI '{}'", value)));
    }
    if Path::new(value).components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(rejected(key, format!("'..' is not allowed in '{}'", value)));
    }
    Ok(())
}

fn check_host(key: &str, value: &str) -> Result<(), AlertDeskError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '/' || c.is_control()) {
        return Err(rejected(key, format!("invalid listen address '{}'", value)));
    }
    Ok(())
}

/// Absolute http(s) URL with a host and no embedded credentials.
pub fn check_base_url(key: &str, value: &str) -> Result<Url, AlertDeskError> {
    let url = Url::parse(value.trim()).map_err(|e| rejected(key, format!("'{}' is not a URL: {}", value, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(rejected(key, format!("scheme '{}' is not allowed, use http or https", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(rejected(key, "URL has no host"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(rejected(key, "credentials must not be embedded in the URL"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass() {
        assert!(validate_endpoints(&ConsoleConfig::default()).is_ok());
    }

    #[test]
    fn test_parent_dir_in_session_path_rejected() {
        let mut config = ConsoleConfig::default();
        config.session.path = "./data/../../etc/passwd".into();
        let err = validate_endpoints(&config).unwrap_err();
        assert!(err.to_string().contains("session.path"));
    }

    #[test]
    fn test_dotted_file_names_allowed() {
        assert!(check_local_path("server.db", "./data/alerts..v2.db").is_ok());
        assert!(check_local_path("server.db", "/var/lib/alertdesk/alertdesk.db").is_ok());
    }

    #[test]
    fn test_uri_as_db_path_rejected() {
        let err = check_local_path("server.db", "file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("server.db"));
        assert!(check_local_path("server.db", "https://x/db").is_err());
    }

    #[test]
    fn test_base_url_schemes() {
        assert!(check_base_url("gateway.base_url", "https://alerts.example.com/api").is_ok());
        assert!(check_base_url("gateway.base_url", "http://127.0.0.1:8080").is_ok());
        for bad in ["javascript:void(0)", "data:text/html,hi", "file:///etc/hosts", "ftp://host/"] {
            assert!(check_base_url("gateway.base_url", bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_base_url_credentials_rejected() {
        let err = check_base_url("gateway.base_url", "https://admin:pw@alerts.example.com").unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_host_with_markup_rejected() {
        let mut config = ConsoleConfig::default();
        config.server.host = "<script>alert(1)</script>".into();
        assert!(validate_endpoints(&config).is_err());
    }
}

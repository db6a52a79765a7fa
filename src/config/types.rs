use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    pub gateway: GatewayConfig,
    pub mock: MockConfig,
    pub notifications: NotificationConfig,
    pub pagination: PaginationConfig,
    pub session: SessionConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    #[default]
    Mock,
    Http,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::Mock,
            base_url: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockConfig {
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub seed: Option<u64>,
    pub dataset_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_ms: 400,
            failure_rate: 0.1,
            seed: None,
            dataset_size: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_secs: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_secs: 5 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: crate::models::DEFAULT_PAGE_SIZE }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { path: "./data/session.json".into() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db: "./data/alertdesk.db".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ConsoleConfig = serde_yaml::from_str("gateway:\n  mode: http\n  base_url: http://localhost:8080\n").unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Http);
        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.mock.latency_ms, 400);
        assert_eq!(config.notifications.ttl_secs, 5);
        assert_eq!(config.pagination.page_size, 20);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: ConsoleConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Mock);
        assert!((config.mock.failure_rate - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 8080);
    }
}

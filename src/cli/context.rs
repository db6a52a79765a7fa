use std::path::PathBuf;
use crate::cli::Cli;
use crate::config::{self, ConsoleConfig, GatewayMode};
use crate::coordinator::BulkCoordinator;
use crate::errors::AlertDeskError;
use crate::gateway;
use crate::notifications::NotificationQueue;
use crate::session::SessionManager;
use crate::store::{Fetch, Store};
use tracing::debug;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<String>,
    pub gateway: Option<GatewayMode>,
    pub base_url: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl From<&Cli> for GlobalOpts {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            gateway: cli.gateway,
            base_url: cli.base_url.clone(),
            json: cli.json,
            quiet: cli.quiet,
        }
    }
}

/// Config file, then CLI overrides.
pub async fn load_config(opts: &GlobalOpts) -> Result<ConsoleConfig, AlertDeskError> {
    let path = opts.config.as_ref().map(PathBuf::from);
    let mut config = config::load_or_default(path.as_deref()).await?;

    if let Some(url) = &opts.base_url {
        config::security::check_base_url("--base-url", url)?;
        config.gateway.base_url = Some(url.clone());
        config.gateway.mode = GatewayMode::Http;
    }
    if let Some(mode) = opts.gateway {
        config.gateway.mode = mode;
    }
    if config.gateway.mode == GatewayMode::Http && config.gateway.base_url.is_none() {
        return Err(AlertDeskError::Config("http gateway needs --base-url or gateway.base_url".into()));
    }
    Ok(config)
}

/// Everything a console command needs, wired from the configuration.
pub struct Console {
    pub config: ConsoleConfig,
    pub store: Store,
    pub coordinator: BulkCoordinator,
    pub session: SessionManager,
    pub json: bool,
    pub quiet: bool,
}

impl Console {
    pub async fn connect(opts: &GlobalOpts) -> Result<Self, AlertDeskError> {
        let config = load_config(opts).await?;
        let gateway = gateway::create_gateway(&config)?;
        debug!(gateway = gateway.gateway_name(), "Gateway ready");

        let ttl_secs = config
            .notifications
            .ttl_secs
            .clamp(1, config::parser::MAX_NOTIFICATION_TTL_SECS);
        let notifications = NotificationQueue::new(chrono::Duration::seconds(ttl_secs));
        let store = Store::new(gateway, notifications);
        let coordinator = BulkCoordinator::new(store.clone());
        let session = SessionManager::new(&config.session.path);

        Ok(Self {
            config,
            store,
            coordinator,
            session,
            json: opts.json,
            quiet: opts.quiet,
        })
    }

    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.config.pagination.page_size)
    }
}

/// Turn a soft load failure into an error for the exit code.
pub fn loaded<T>(fetch: Fetch<T>) -> Result<T, AlertDeskError> {
    match fetch {
        Fetch::Loaded(value) => Ok(value),
        Fetch::Failed(message) => Err(AlertDeskError::Gateway(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_base_url_implies_http() {
        let opts = GlobalOpts {
            base_url: Some("http://127.0.0.1:8080".into()),
            ..Default::default()
        };
        let config = load_config(&opts).await.unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Http);
    }

    #[tokio::test]
    async fn test_http_without_url_rejected() {
        let opts = GlobalOpts {
            gateway: Some(GatewayMode::Http),
            ..Default::default()
        };
        assert!(matches!(load_config(&opts).await, Err(AlertDeskError::Config(_))));
    }

    #[tokio::test]
    async fn test_base_url_flag_scheme_checked() {
        let opts = GlobalOpts {
            base_url: Some("file:///etc/passwd".into()),
            ..Default::default()
        };
        let err = load_config(&opts).await.unwrap_err();
        assert!(err.to_string().contains("--base-url"));
    }

    #[test]
    fn test_loaded_maps_failure() {
        assert_eq!(loaded(Fetch::Loaded(3)).unwrap(), 3);
        assert!(loaded::<u8>(Fetch::Failed("boom".into())).is_err());
    }
}

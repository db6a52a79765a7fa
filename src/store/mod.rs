pub mod command;
pub mod reducer;
pub mod state;

pub use command::Command;
pub use reducer::reduce;
pub use state::{AlertSlice, ConsoleState, PolicySlice, ServerSlice, Slice};

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use crate::errors::AlertDeskError;
use crate::gateway::AlertGateway;
use crate::models::{AlertFilters, AlertQuery, AlertRecord, FilePolicyRecord, Page, PageRequest, Policy, ServerRecord};
use crate::notifications::NotificationQueue;

const EVENT_CAPACITY: usize = 256;

/// Sent to subscribers after every applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub version: u64,
    pub command: &'static str,
}

/// Outcome of a load that never propagates an error to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Loaded(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Fetch::Loaded(v) => Some(v),
            Fetch::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetch::Failed(_))
    }
}

struct Inner {
    state: ConsoleState,
    version: u64,
}

/// Single source of truth for alert, policy and server records.
///
/// All mutation goes through [`Store::dispatch`]; readers take snapshots or
/// run closures over the current state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<StoreEvent>,
    gateway: Arc<dyn AlertGateway>,
    notifications: NotificationQueue,
}

impl Store {
    pub fn new(gateway: Arc<dyn AlertGateway>, notifications: NotificationQueue) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: ConsoleState::default(),
                version: 0,
            })),
            events,
            gateway,
            notifications,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn AlertGateway> {
        &self.gateway
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Apply a command and notify subscribers. Returns the new state version.
    pub async fn dispatch(&self, command: Command) -> u64 {
        let name = command.name();
        let version = {
            let mut inner = self.inner.write().await;
            reduce(&mut inner.state, command);
            inner.version += 1;
            inner.version
        };
        debug!(command = name, version, "Dispatched");
        // no subscribers is fine
        let _ = self.events.send(StoreEvent { version, command: name });
        version
    }

    pub async fn snapshot(&self) -> ConsoleState {
        self.inner.read().await.state.clone()
    }

    pub async fn version(&self) -> u64 {
        self.inner.read().await.version
    }

    pub async fn select<R>(&self, selector: impl FnOnce(&ConsoleState) -> R) -> R {
        let inner = self.inner.read().await;
        selector(&inner.state)
    }

    /// Load one page of pending alerts. Failures land in `alerts.error`.
    pub async fn get_pending_list(
        &self,
        filters: AlertFilters,
        page: PageRequest,
    ) -> Fetch<Page<AlertRecord>> {
        let query = AlertQuery::new(&filters, page);
        self.dispatch(Command::PendingRequested { filters, page }).await;

        match self.gateway.fetch_pending(&query).await {
            Ok(result) => {
                self.dispatch(Command::PendingLoaded(result.clone())).await;
                Fetch::Loaded(result)
            }
            Err(e) => self.fail_soft(e, Command::AlertsFailed, "load pending alerts").await,
        }
    }

    /// Reload the pending page with the filters and page currently in the store.
    pub async fn refresh_pending(&self) -> Fetch<Page<AlertRecord>> {
        let (filters, page) = self.select(|s| (s.alerts.filters.clone(), s.alerts.page)).await;
        self.get_pending_list(filters, page).await
    }

    pub async fn get_completed_list(&self, page: PageRequest) -> Fetch<Page<AlertRecord>> {
        let filters = self.select(|s| s.alerts.filters.clone()).await;
        let query = AlertQuery::new(&filters, page);
        self.dispatch(Command::CompletedRequested { page }).await;

        match self.gateway.fetch_completed(&query).await {
            Ok(result) => {
                self.dispatch(Command::CompletedLoaded(result.clone())).await;
                Fetch::Loaded(result)
            }
            Err(e) => self.fail_soft(e, Command::AlertsFailed, "load completed alerts").await,
        }
    }

    pub async fn get_detection(&self, id: &str) -> Fetch<AlertRecord> {
        match self.gateway.fetch_detection(id).await {
            Ok(record) => {
                self.dispatch(Command::DetectionLoaded(record.clone())).await;
                Fetch::Loaded(record)
            }
            Err(e) => self.fail_soft(e, Command::AlertsFailed, "load detection").await,
        }
    }

    /// Fetch `ids` quietly so their current status is known locally.
    /// Ids the backend cannot return are skipped; no error state, no notification.
    /// Returns how many records were merged.
    pub async fn preload_records(&self, ids: &[String]) -> usize {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.gateway.fetch_detection(id).await {
                Ok(record) => records.push(record),
                Err(e) => debug!(id = %id, error = %e, "Preload skipped"),
            }
        }
        let merged = records.len();
        if merged > 0 {
            self.dispatch(Command::RecordsMerged(records)).await;
        }
        merged
    }

    pub async fn load_policies(&self, policy: Policy, page: PageRequest) -> Fetch<Page<FilePolicyRecord>> {
        self.dispatch(Command::PoliciesRequested).await;
        match self.gateway.fetch_policies(policy, page).await {
            Ok(result) => {
                self.dispatch(Command::PoliciesLoaded { policy, page: result.clone() }).await;
                Fetch::Loaded(result)
            }
            Err(e) => self.fail_soft(e, Command::PoliciesFailed, "load file policies").await,
        }
    }

    pub async fn load_servers(&self) -> Fetch<Vec<ServerRecord>> {
        self.dispatch(Command::ServersRequested).await;
        match self.gateway.list_servers().await {
            Ok(servers) => {
                self.dispatch(Command::ServersLoaded(servers.clone())).await;
                Fetch::Loaded(servers)
            }
            Err(e) => self.fail_soft(e, Command::ServersFailed, "load servers").await,
        }
    }

    pub async fn set_filters(&self, filters: AlertFilters) {
        self.dispatch(Command::FiltersChanged(filters)).await;
    }

    pub async fn set_selected_row_keys(&self, keys: Vec<String>) {
        self.dispatch(Command::SetSelectedRowKeys(keys)).await;
    }

    pub async fn clear_selected_rows(&self) {
        self.dispatch(Command::ClearSelectedRows).await;
    }

    pub async fn clear_error(&self, slice: Slice) {
        self.dispatch(Command::ClearError(slice)).await;
    }

    async fn fail_soft<T>(
        &self,
        error: AlertDeskError,
        to_command: fn(String) -> Command,
        operation: &str,
    ) -> Fetch<T> {
        let class = error.classify();
        warn!(operation, error_type = class.error_type, error = %error, "Load failed");
        let message = error.to_string();
        self.dispatch(to_command(message.clone())).await;
        self.notifications.error(format!("Failed to {}: {}", operation, message));
        Fetch::Failed(message)
    }
}

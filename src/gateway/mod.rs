pub mod mock;
pub mod http;

pub use mock::MockGateway;
pub use http::HttpGateway;

use std::sync::Arc;
use async_trait::async_trait;
use crate::config::{GatewayMode, ConsoleConfig};
use crate::errors::AlertDeskError;
use crate::models::{
    AlertQuery, AlertRecord, BulkActionRequest, BulkOutcome, ExceptionRequest, FilePolicyRecord,
    Page, PageRequest, Policy, PolicyMoveRequest, PolicyRemoveRequest, ServerAssignment,
    ServerRecord,
};

/// Everything the console asks of the backend.
///
/// The store and the coordinator only talk to this trait, so a mock and a real
/// HTTP backend are interchangeable.
#[async_trait]
pub trait AlertGateway: Send + Sync {
    async fn fetch_pending(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError>;

    async fn fetch_completed(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError>;

    async fn fetch_detection(&self, id: &str) -> Result<AlertRecord, AlertDeskError>;

    async fn bulk_process(&self, request: &BulkActionRequest) -> Result<BulkOutcome, AlertDeskError>;

    /// Promote to / demote from the file-policy lists. Returns the policy
    /// records as they now exist (empty on demotion).
    async fn set_exception(
        &self,
        request: &ExceptionRequest,
    ) -> Result<Vec<FilePolicyRecord>, AlertDeskError>;

    async fn fetch_policies(
        &self,
        policy: Policy,
        page: PageRequest,
    ) -> Result<Page<FilePolicyRecord>, AlertDeskError>;

    async fn bulk_move(&self, request: &PolicyMoveRequest) -> Result<BulkOutcome, AlertDeskError>;

    async fn bulk_remove(&self, request: &PolicyRemoveRequest) -> Result<BulkOutcome, AlertDeskError>;

    async fn list_servers(&self) -> Result<Vec<ServerRecord>, AlertDeskError>;

    async fn assign_servers(&self, request: &ServerAssignment) -> Result<BulkOutcome, AlertDeskError>;

    /// Gateway name for logging
    fn gateway_name(&self) -> &str;
}

/// Build the gateway selected by the configuration.
pub fn create_gateway(config: &ConsoleConfig) -> Result<Arc<dyn AlertGateway>, AlertDeskError> {
    match config.gateway.mode {
        GatewayMode::Mock => Ok(Arc::new(MockGateway::from_config(&config.mock))),
        GatewayMode::Http => Ok(Arc::new(HttpGateway::from_config(&config.gateway)?)),
    }
}

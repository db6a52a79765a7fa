//! Multi-record mutations: validate locally, call the backend once, then
//! reconcile the store. On failure the store keeps its records untouched.

use std::sync::Arc;
use dashmap::DashMap;
use tracing::{info, warn};
use crate::errors::AlertDeskError;
use crate::models::{
    BulkActionRequest, BulkOutcome, ExceptionKind, ExceptionRequest, FilePolicyRecord, Policy,
    PolicyMoveRequest, PolicyRemoveRequest, ServerAssignment,
};
use crate::store::{Command, Store};

/// Tracks ids touched by bulk operations that have not resolved yet.
#[derive(Default)]
struct InFlight {
    ids: DashMap<String, usize>,
}

impl InFlight {
    /// Register `ids` and return how many were already in flight.
    fn enter(&self, ids: &[String]) -> usize {
        let mut overlapping = 0;
        for id in ids {
            let mut count = self.ids.entry(id.clone()).or_insert(0);
            if *count > 0 {
                overlapping += 1;
            }
            *count += 1;
        }
        overlapping
    }

    fn leave(&self, ids: &[String]) {
        for id in ids {
            self.ids.remove_if_mut(id, |_, count| {
                *count -= 1;
                *count == 0
            });
        }
    }
}

struct InFlightGuard<'a> {
    registry: &'a InFlight,
    ids: Vec<String>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.leave(&self.ids);
    }
}

#[derive(Clone)]
pub struct BulkCoordinator {
    store: Store,
    in_flight: Arc<InFlight>,
}

impl BulkCoordinator {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Ids currently held by an unresolved bulk operation.
    pub fn in_flight_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.in_flight.ids.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    fn track(&self, operation: &str, ids: &[String]) -> InFlightGuard<'_> {
        let overlapping = self.in_flight.enter(ids);
        if overlapping > 0 {
            // Concurrent actions on the same records are not serialized.
            warn!(operation, overlapping, "Bulk operation overlaps another in-flight operation");
        }
        InFlightGuard {
            registry: &self.in_flight,
            ids: ids.to_vec(),
        }
    }

    /// Apply `action` to every selected alert.
    ///
    /// Rejected before any remote call when the selection is empty or names
    /// an alert the store already knows to be processed. Ids the store has
    /// never loaded are left for the backend to judge.
    pub async fn bulk_process(&self, request: BulkActionRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        let not_pending: Vec<String> = self
            .store
            .select(|s| {
                request
                    .selected_ids
                    .iter()
                    .filter(|id| s.alerts.get(id).map_or(false, |r| !r.is_pending()))
                    .cloned()
                    .collect()
            })
            .await;
        if !not_pending.is_empty() {
            return Err(AlertDeskError::InvalidTransition(format!(
                "Only pending records can be processed: {}",
                not_pending.join(", ")
            )));
        }

        let _guard = self.track("bulk_process", &request.selected_ids);
        self.store.dispatch(Command::BulkProcessStarted).await;

        match self.store.gateway().bulk_process(&request).await {
            Ok(outcome) => {
                info!(
                    count = request.selected_ids.len(),
                    updated = outcome.updated,
                    action = %request.action,
                    user_id = %request.user_id,
                    "Bulk action applied"
                );
                let count = request.selected_ids.len();
                let action = request.action;
                self.store
                    .dispatch(Command::BulkProcessSucceeded {
                        ids: request.selected_ids,
                        action,
                        memo: request.memo,
                        user_id: request.user_id,
                    })
                    .await;
                self.store
                    .notifications()
                    .success(format!("{} record(s) set to {}", count, action));
                Ok(outcome)
            }
            Err(e) => {
                self.report_failure(&e, "bulk_process", Command::BulkProcessFailed).await;
                Err(e)
            }
        }
    }

    /// Promote alerts to a file-policy list, or demote them with `ExceptionKind::None`.
    pub async fn apply_exception(
        &self,
        ids: Vec<String>,
        exception: ExceptionKind,
    ) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        let request = ExceptionRequest { ids, exception };
        request.validate()?;

        let _guard = self.track("apply_exception", &request.ids);
        self.store.dispatch(Command::BulkProcessStarted).await;

        match self.store.gateway().set_exception(&request).await {
            Ok(records) => {
                info!(count = request.ids.len(), exception = %exception, "Exception applied");
                let count = request.ids.len();
                self.store
                    .dispatch(Command::ExceptionApplied {
                        ids: request.ids,
                        exception,
                        records: records.clone(),
                    })
                    .await;
                self.store
                    .notifications()
                    .success(format!("{} record(s) marked {}", count, exception));
                Ok(records)
            }
            Err(e) => {
                self.report_failure(&e, "apply_exception", Command::BulkProcessFailed).await;
                Err(e)
            }
        }
    }

    /// Move file-policy records to the `to` list.
    pub async fn bulk_move(&self, ids: Vec<String>, to: Policy) -> Result<BulkOutcome, AlertDeskError> {
        let request = PolicyMoveRequest { ids, policy: to };
        request.validate()?;

        let _guard = self.track("bulk_move", &request.ids);
        self.store.dispatch(Command::PolicyMutationStarted).await;

        match self.store.gateway().bulk_move(&request).await {
            Ok(outcome) => {
                info!(count = request.ids.len(), updated = outcome.updated, to = %to, "Policies moved");
                self.store.dispatch(Command::PoliciesMoved { ids: request.ids, to }).await;
                self.store
                    .notifications()
                    .success(format!("{} record(s) moved to {}", outcome.updated, to));
                Ok(outcome)
            }
            Err(e) => {
                self.report_failure(&e, "bulk_move", Command::PoliciesFailed).await;
                Err(e)
            }
        }
    }

    pub async fn bulk_remove(&self, ids: Vec<String>) -> Result<BulkOutcome, AlertDeskError> {
        let request = PolicyRemoveRequest { ids };
        request.validate()?;

        let _guard = self.track("bulk_remove", &request.ids);
        self.store.dispatch(Command::PolicyMutationStarted).await;

        match self.store.gateway().bulk_remove(&request).await {
            Ok(outcome) => {
                info!(count = request.ids.len(), removed = outcome.updated, "Policies removed");
                self.store.dispatch(Command::PoliciesRemoved { ids: request.ids }).await;
                self.store
                    .notifications()
                    .success(format!("{} record(s) removed", outcome.updated));
                Ok(outcome)
            }
            Err(e) => {
                self.report_failure(&e, "bulk_remove", Command::PoliciesFailed).await;
                Err(e)
            }
        }
    }

    pub async fn assign_servers(
        &self,
        ids: Vec<String>,
        cluster: Option<String>,
        manager: Option<String>,
    ) -> Result<BulkOutcome, AlertDeskError> {
        let request = ServerAssignment { ids, cluster, manager };
        request.validate()?;

        let _guard = self.track("assign_servers", &request.ids);
        self.store.dispatch(Command::ServersRequested).await;

        match self.store.gateway().assign_servers(&request).await {
            Ok(outcome) => {
                info!(count = request.ids.len(), updated = outcome.updated, "Servers assigned");
                self.store
                    .dispatch(Command::ServersAssigned {
                        ids: request.ids,
                        cluster: request.cluster,
                        manager: request.manager,
                    })
                    .await;
                self.store
                    .notifications()
                    .success(format!("{} server(s) assigned", outcome.updated));
                Ok(outcome)
            }
            Err(e) => {
                self.report_failure(&e, "assign_servers", Command::ServersFailed).await;
                Err(e)
            }
        }
    }

    async fn report_failure(
        &self,
        error: &AlertDeskError,
        operation: &str,
        to_command: fn(String) -> Command,
    ) {
        let class = error.classify();
        warn!(operation, error_type = class.error_type, error = %error, "Bulk operation failed");
        self.store.dispatch(to_command(error.to_string())).await;
        self.store.notifications().error(error.to_string());
    }
}

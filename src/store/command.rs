use crate::models::{
    AlertFilters, AlertRecord, ExceptionKind, FilePolicyRecord, Page, PageRequest, Policy,
    ProcessStatus, ServerRecord,
};
use super::state::Slice;

/// Every mutation the store accepts. Commands are applied by [`super::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PendingRequested {
        filters: AlertFilters,
        page: PageRequest,
    },
    PendingLoaded(Page<AlertRecord>),
    CompletedRequested {
        page: PageRequest,
    },
    CompletedLoaded(Page<AlertRecord>),
    /// Change the active filters without loading anything.
    FiltersChanged(AlertFilters),
    DetectionLoaded(AlertRecord),
    /// Merge records into the flat collection without touching the detection view.
    RecordsMerged(Vec<AlertRecord>),
    AlertsFailed(String),

    /// Replace the alert selection wholesale.
    SetSelectedRowKeys(Vec<String>),
    ClearSelectedRows,

    BulkProcessStarted,
    BulkProcessSucceeded {
        ids: Vec<String>,
        action: ProcessStatus,
        memo: String,
        user_id: String,
    },
    BulkProcessFailed(String),

    ExceptionApplied {
        ids: Vec<String>,
        exception: ExceptionKind,
        /// Policy records created by a promotion; empty on demotion.
        records: Vec<FilePolicyRecord>,
    },

    PoliciesRequested,
    PoliciesLoaded {
        policy: Policy,
        page: Page<FilePolicyRecord>,
    },
    SetSelectedPolicies(Vec<String>),
    PolicyMutationStarted,
    PoliciesMoved {
        ids: Vec<String>,
        to: Policy,
    },
    PoliciesRemoved {
        ids: Vec<String>,
    },
    PoliciesFailed(String),

    ServersRequested,
    ServersLoaded(Vec<ServerRecord>),
    SetSelectedServers(Vec<String>),
    ServersAssigned {
        ids: Vec<String>,
        cluster: Option<String>,
        manager: Option<String>,
    },
    ServersFailed(String),

    ClearError(Slice),
}

impl Command {
    /// Stable name used in logs and store events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PendingRequested { .. } => "alerts/pending_requested",
            Self::PendingLoaded(_) => "alerts/pending_loaded",
            Self::CompletedRequested { .. } => "alerts/completed_requested",
            Self::CompletedLoaded(_) => "alerts/completed_loaded",
            Self::FiltersChanged(_) => "alerts/filters_changed",
            Self::DetectionLoaded(_) => "alerts/detection_loaded",
            Self::RecordsMerged(_) => "alerts/records_merged",
            Self::AlertsFailed(_) => "alerts/failed",
            Self::SetSelectedRowKeys(_) => "alerts/set_selected_row_keys",
            Self::ClearSelectedRows => "alerts/clear_selected_rows",
            Self::BulkProcessStarted => "alerts/bulk_process_started",
            Self::BulkProcessSucceeded { .. } => "alerts/bulk_process_succeeded",
            Self::BulkProcessFailed(_) => "alerts/bulk_process_failed",
            Self::ExceptionApplied { .. } => "alerts/exception_applied",
            Self::PoliciesRequested => "policies/requested",
            Self::PoliciesLoaded { .. } => "policies/loaded",
            Self::SetSelectedPolicies(_) => "policies/set_selected",
            Self::PolicyMutationStarted => "policies/mutation_started",
            Self::PoliciesMoved { .. } => "policies/moved",
            Self::PoliciesRemoved { .. } => "policies/removed",
            Self::PoliciesFailed(_) => "policies/failed",
            Self::ServersRequested => "servers/requested",
            Self::ServersLoaded(_) => "servers/loaded",
            Self::SetSelectedServers(_) => "servers/set_selected",
            Self::ServersAssigned { .. } => "servers/assigned",
            Self::ServersFailed(_) => "servers/failed",
            Self::ClearError(_) => "clear_error",
        }
    }
}

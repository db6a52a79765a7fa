use serde::{Deserialize, Serialize};
use crate::models::{
    AlertFilters, AlertRecord, FilePolicyRecord, PageRequest, Policy, ServerRecord,
};
use crate::selectors;

/// Everything the console shows, in one process-wide value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsoleState {
    pub alerts: AlertSlice,
    pub policies: PolicySlice,
    pub servers: ServerSlice,
}

/// Identifies a slice for slice-wide commands such as clearing its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slice {
    Alerts,
    Policies,
    Servers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertSlice {
    /// Flat collection holding both pending and processed records, newest first.
    pub records: Vec<AlertRecord>,
    pub pending_total: usize,
    pub completed_total: usize,
    pub filters: AlertFilters,
    pub page: PageRequest,
    pub selected_row_keys: Vec<String>,
    pub detection: Option<AlertRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AlertSlice {
    pub fn get(&self, id: &str) -> Option<&AlertRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn pending(&self) -> Vec<&AlertRecord> {
        selectors::pending_queue(&self.records)
    }

    pub fn completed(&self) -> Vec<&AlertRecord> {
        selectors::completed_queue(&self.records)
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.pending().into_iter().map(|r| r.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicySlice {
    pub records: Vec<FilePolicyRecord>,
    pub blacklist_total: usize,
    pub whitelist_total: usize,
    pub selected_row_keys: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PolicySlice {
    pub fn get(&self, id: &str) -> Option<&FilePolicyRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn blacklist(&self) -> Vec<&FilePolicyRecord> {
        selectors::blacklist_queue(&self.records)
    }

    pub fn whitelist(&self) -> Vec<&FilePolicyRecord> {
        selectors::whitelist_queue(&self.records)
    }

    pub fn total_for(&self, policy: Policy) -> usize {
        match policy {
            Policy::Blacklist => self.blacklist_total,
            Policy::Whitelist => self.whitelist_total,
        }
    }

    pub(crate) fn total_for_mut(&mut self, policy: Policy) -> &mut usize {
        match policy {
            Policy::Blacklist => &mut self.blacklist_total,
            Policy::Whitelist => &mut self.whitelist_total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerSlice {
    pub records: Vec<ServerRecord>,
    pub selected_row_keys: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ServerSlice {
    pub fn get(&self, id: &str) -> Option<&ServerRecord> {
        self.records.iter().find(|s| s.id == id)
    }
}

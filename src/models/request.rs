use serde::{Deserialize, Serialize};
use crate::errors::AlertDeskError;
use super::alert::{ExceptionKind, ProcessStatus};
use super::policy::Policy;

/// A status change applied to several alerts in one dispatch. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    #[serde(rename = "ids")]
    pub selected_ids: Vec<String>,
    #[serde(rename = "process_status")]
    pub action: ProcessStatus,
    #[serde(rename = "comments", default)]
    pub memo: String,
    #[serde(default)]
    pub user_id: String,
}

impl BulkActionRequest {
    pub fn new(
        selected_ids: Vec<String>,
        action: ProcessStatus,
        memo: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            selected_ids,
            action,
            memo: memo.into(),
            user_id: user_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AlertDeskError> {
        require_ids(&self.selected_ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRequest {
    pub ids: Vec<String>,
    pub exception: ExceptionKind,
}

impl ExceptionRequest {
    pub fn validate(&self) -> Result<(), AlertDeskError> {
        require_ids(&self.ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyMoveRequest {
    pub ids: Vec<String>,
    /// Destination list.
    pub policy: Policy,
}

impl PolicyMoveRequest {
    pub fn validate(&self) -> Result<(), AlertDeskError> {
        require_ids(&self.ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRemoveRequest {
    pub ids: Vec<String>,
}

impl PolicyRemoveRequest {
    pub fn validate(&self) -> Result<(), AlertDeskError> {
        require_ids(&self.ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAssignment {
    pub ids: Vec<String>,
    pub cluster: Option<String>,
    pub manager: Option<String>,
}

impl ServerAssignment {
    pub fn validate(&self) -> Result<(), AlertDeskError> {
        require_ids(&self.ids)?;
        if self.cluster.is_none() && self.manager.is_none() {
            return Err(AlertDeskError::Validation(
                "Assignment needs a cluster, a manager, or both".into(),
            ));
        }
        Ok(())
    }
}

/// Result of a bulk mutation as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub updated: usize,
}

fn require_ids(ids: &[String]) -> Result<(), AlertDeskError> {
    if ids.is_empty() {
        return Err(AlertDeskError::Validation("No records selected".into()));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(AlertDeskError::Validation("Record ids must not be blank".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_request_wire_names() {
        let req = BulkActionRequest::new(vec!["a1".into()], ProcessStatus::Delete, "dup", "u-7");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["ids"][0], "a1");
        assert_eq!(value["process_status"], "delete");
        assert_eq!(value["comments"], "dup");
        assert_eq!(value["user_id"], "u-7");
    }

    #[test]
    fn test_empty_selection_rejected() {
        let req = BulkActionRequest::new(vec![], ProcessStatus::Delete, "", "");
        assert!(matches!(req.validate(), Err(AlertDeskError::Validation(_))));
    }

    #[test]
    fn test_blank_id_rejected() {
        let req = PolicyRemoveRequest { ids: vec!["  ".into()] };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_assignment_requires_target() {
        let req = ServerAssignment { ids: vec!["s1".into()], cluster: None, manager: None };
        assert!(req.validate().is_err());
        let req = ServerAssignment { ids: vec!["s1".into()], cluster: Some("edge".into()), manager: None };
        assert!(req.validate().is_ok());
    }
}

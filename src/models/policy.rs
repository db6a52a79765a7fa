use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::alert::{AlertRecord, ExceptionKind};

/// Which file-policy list a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Blacklist,
    Whitelist,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blacklist => "blacklist",
            Self::Whitelist => "whitelist",
        }
    }

    pub fn as_exception(&self) -> ExceptionKind {
        match self {
            Self::Blacklist => ExceptionKind::Blacklist,
            Self::Whitelist => ExceptionKind::Whitelist,
        }
    }

    /// `None` for `ExceptionKind::None`: such records are not on any list.
    pub fn from_exception(exception: ExceptionKind) -> Option<Self> {
        match exception {
            ExceptionKind::Blacklist => Some(Self::Blacklist),
            ExceptionKind::Whitelist => Some(Self::Whitelist),
            ExceptionKind::None => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Blacklist => Self::Whitelist,
            Self::Whitelist => Self::Blacklist,
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blacklist" => Ok(Self::Blacklist),
            "whitelist" => Ok(Self::Whitelist),
            other => Err(format!("unknown policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

impl std::str::FromStr for ListStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown list status '{}'", other)),
        }
    }
}

/// An alert promoted onto the blacklist or whitelist.
///
/// `alert.exception` always mirrors `policy`; use [`FilePolicyRecord::set_policy`]
/// rather than writing the field directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePolicyRecord {
    #[serde(flatten)]
    pub alert: AlertRecord,
    pub policy: Policy,
    #[serde(default)]
    pub list_status: ListStatus,
    pub created_at: DateTime<Utc>,
}

impl FilePolicyRecord {
    pub fn promote(mut alert: AlertRecord, policy: Policy) -> Self {
        alert.exception = policy.as_exception();
        Self {
            alert,
            policy,
            list_status: ListStatus::Enabled,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.alert.id
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
        self.alert.exception = policy.as_exception();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::{RiskScore, Verdict, ProcessStatus};

    fn alert(id: &str) -> AlertRecord {
        AlertRecord {
            id: id.to_string(),
            time: Utc::now(),
            file_name: "dropper.dll".to_string(),
            server_ip: "10.1.1.1".to_string(),
            risk: RiskScore::new(90),
            verdict: Verdict::Malware,
            process_status: ProcessStatus::Quarantine,
            exception: ExceptionKind::None,
            memo: None,
            processed_by: None,
        }
    }

    #[test]
    fn test_promote_mirrors_exception() {
        let record = FilePolicyRecord::promote(alert("a1"), Policy::Blacklist);
        assert_eq!(record.alert.exception, ExceptionKind::Blacklist);
        assert_eq!(record.list_status, ListStatus::Enabled);
        // process status is untouched by the exception workflow
        assert_eq!(record.alert.process_status, ProcessStatus::Quarantine);
    }

    #[test]
    fn test_set_policy_keeps_mirror() {
        let mut record = FilePolicyRecord::promote(alert("a1"), Policy::Whitelist);
        record.set_policy(record.policy.opposite());
        assert_eq!(record.policy, Policy::Blacklist);
        assert_eq!(record.alert.exception, ExceptionKind::Blacklist);
    }

    #[test]
    fn test_flattened_wire_shape() {
        let record = FilePolicyRecord::promote(alert("a9"), Policy::Whitelist);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "a9");
        assert_eq!(value["policy"], "whitelist");
        assert_eq!(value["exception"], "whitelist");
        assert_eq!(value["list_status"], "enabled");
    }
}

use serde::{Deserialize, Serialize};

/// A monitored host and the cluster/manager it reports to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: String,
    pub server_ip: String,
    pub hostname: String,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
}

impl ServerRecord {
    pub fn is_assigned(&self) -> bool {
        self.cluster.is_some() || self.manager.is_some()
    }
}

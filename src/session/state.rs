use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What survives between CLI invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub has_logged_out: bool,
    pub user_id: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
    pub logged_out_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        // a fresh install counts as logged out
        Self {
            has_logged_out: true,
            user_id: None,
            logged_in_at: None,
            logged_out_at: None,
        }
    }
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        !self.has_logged_out && self.user_id.is_some()
    }

    /// User attributed to bulk actions; empty when nobody is logged in.
    pub fn acting_user(&self) -> &str {
        if self.has_logged_out {
            return "";
        }
        self.user_id.as_deref().unwrap_or("")
    }
}

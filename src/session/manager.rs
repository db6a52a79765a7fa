use std::path::{Path, PathBuf};
use chrono::Utc;
use tracing::{debug, info};
use crate::errors::AlertDeskError;
use super::state::SessionState;

/// Reads and writes the session file.
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means a fresh, logged-out session.
    pub async fn load(&self) -> Result<SessionState, AlertDeskError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No session file");
            return Ok(SessionState::default());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn save(&self, state: &SessionState) -> Result<(), AlertDeskError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    pub async fn login(&self, user_id: &str) -> Result<SessionState, AlertDeskError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AlertDeskError::Validation("User id must not be empty".into()));
        }
        let state = SessionState {
            has_logged_out: false,
            user_id: Some(user_id.to_string()),
            logged_in_at: Some(Utc::now()),
            logged_out_at: None,
        };
        self.save(&state).await?;
        info!(user_id, "Logged in");
        Ok(state)
    }

    /// Keeps the last user id so the next login can suggest it.
    pub async fn logout(&self) -> Result<SessionState, AlertDeskError> {
        let mut state = self.load().await?;
        state.has_logged_out = true;
        state.logged_out_at = Some(Utc::now());
        self.save(&state).await?;
        info!(user_id = state.user_id.as_deref().unwrap_or("-"), "Logged out");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(dir.path().join("session.json"));
        let state = manager.load().await.unwrap();
        assert!(state.has_logged_out);
        assert!(!state.is_active());
        assert_eq!(state.acting_user(), "");
    }

    #[tokio::test]
    async fn test_login_logout_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(dir.path().join("nested").join("session.json"));

        manager.login("analyst-7").await.unwrap();
        let state = manager.load().await.unwrap();
        assert!(state.is_active());
        assert_eq!(state.acting_user(), "analyst-7");

        manager.logout().await.unwrap();
        let state = manager.load().await.unwrap();
        assert!(state.has_logged_out);
        assert_eq!(state.user_id.as_deref(), Some("analyst-7"));
        assert_eq!(state.acting_user(), "");
        assert!(state.logged_out_at.is_some());
    }

    #[tokio::test]
    async fn test_file_uses_camel_case_flag() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(dir.path().join("session.json"));
        manager.login("u1").await.unwrap();

        let raw = std::fs::read_to_string(manager.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["hasLoggedOut"], false);
        assert_eq!(value["userId"], "u1");
    }

    #[tokio::test]
    async fn test_blank_user_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(dir.path().join("session.json"));
        assert!(matches!(manager.login("  ").await, Err(AlertDeskError::Validation(_))));
        assert!(!manager.path().exists());
    }
}

use crate::errors::AlertDeskError;
use super::connection::db_err;
use super::Database;

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, AlertDeskError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")
            .map_err(db_err("Query failed"))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AlertDeskError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), AlertDeskError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        ).map_err(db_err("Insert failed"))?;
        Ok(())
    }

    /// Store every entry of `values` in one transaction. Values must be scalars.
    pub fn set_settings(&self, values: &serde_json::Map<String, serde_json::Value>) -> Result<usize, AlertDeskError> {
        let mut pairs = Vec::with_capacity(values.len());
        for (key, value) in values {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(AlertDeskError::Validation(format!(
                        "Setting '{}' must be a string, number or boolean",
                        key
                    )))
                }
            };
            pairs.push((key.as_str(), text));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
        for (key, text) in &pairs {
            tx.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, text],
            ).map_err(db_err("Insert failed"))?;
        }
        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(pairs.len())
    }

    pub fn get_all_settings(&self) -> Result<serde_json::Value, AlertDeskError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")
            .map_err(db_err("Query failed"))?;

        let mut settings = serde_json::Map::new();
        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        }).map_err(db_err("Query error"))?;

        for row in rows {
            let (key, value): (String, String) = row.map_err(db_err("Row error"))?;
            settings.insert(key, serde_json::Value::String(value));
        }

        Ok(serde_json::Value::Object(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_set_and_get_setting() {
        let db = Database::in_memory().unwrap();
        db.set_setting("retention_days", "90").unwrap();

        let value = db.get_setting("retention_days").unwrap();
        assert_eq!(value, Some("90".to_string()));
    }

    #[test]
    fn test_db_get_nonexistent_setting() {
        let db = Database::in_memory().unwrap();
        let value = db.get_setting("nonexistent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_db_set_setting_upsert() {
        let db = Database::in_memory().unwrap();
        db.set_setting("scan_mode", "realtime").unwrap();
        db.set_setting("scan_mode", "scheduled").unwrap();

        let value = db.get_setting("scan_mode").unwrap();
        assert_eq!(value, Some("scheduled".to_string()));
    }

    #[test]
    fn test_db_get_all_settings() {
        let db = Database::in_memory().unwrap();
        db.set_setting("retention_days", "90").unwrap();
        db.set_setting("scan_mode", "realtime").unwrap();
        db.set_setting("auto_quarantine_threshold", "95").unwrap();

        let all = db.get_all_settings().unwrap();
        let obj = all.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["retention_days"], "90");
        assert_eq!(obj["scan_mode"], "realtime");
        assert_eq!(obj["auto_quarantine_threshold"], "95");
    }

    #[test]
    fn test_db_get_all_settings_empty() {
        let db = Database::in_memory().unwrap();
        let all = db.get_all_settings().unwrap();
        let obj = all.as_object().unwrap();
        assert!(obj.is_empty());
    }

    #[test]
    fn test_db_set_settings_scalars() {
        let db = Database::in_memory().unwrap();
        let values = serde_json::json!({"retention_days": 30, "alerts_enabled": true, "scan_mode": "realtime"});
        let written = db.set_settings(values.as_object().unwrap()).unwrap();
        assert_eq!(written, 3);
        assert_eq!(db.get_setting("retention_days").unwrap().as_deref(), Some("30"));
        assert_eq!(db.get_setting("alerts_enabled").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_db_set_settings_rejects_nested() {
        let db = Database::in_memory().unwrap();
        let values = serde_json::json!({"retention_days": 30, "nested": {"a": 1}});
        assert!(db.set_settings(values.as_object().unwrap()).is_err());
        assert!(db.get_setting("retention_days").unwrap().is_none());
    }
}

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use crate::errors::AlertDeskError;
use crate::models::{FilePolicyRecord, Policy};
use super::alerts::{alert_from_row, ALERT_COLUMNS};
use super::connection::{db_err, parse_column, parse_time, placeholders};
use super::Database;

fn policy_from_row(row: &Row) -> rusqlite::Result<FilePolicyRecord> {
    let alert = alert_from_row(row)?;
    let policy: String = row.get(10)?;
    let list_status: String = row.get(11)?;
    let created_at: String = row.get(12)?;
    let mut record = FilePolicyRecord {
        alert,
        policy: parse_column(10, &policy)?,
        list_status: parse_column(11, &list_status)?,
        created_at: parse_time(12, &created_at)?,
    };
    // the policy row is authoritative for the mirrored exception
    record.set_policy(record.policy);
    Ok(record)
}

fn policy_select(where_clause: &str) -> String {
    format!(
        "SELECT {}, p.policy, p.list_status, p.created_at FROM file_policies p JOIN alerts a ON a.id = p.alert_id WHERE {} ORDER BY p.created_at DESC, a.id ASC",
        ALERT_COLUMNS, where_clause
    )
}

impl Database {
    pub fn list_policies(&self, policy: Policy) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&policy_select("p.policy = ?1")).map_err(db_err("Query failed"))?;
        let rows = stmt
            .query_map(params![policy.as_str()], policy_from_row)
            .map_err(db_err("Query error"))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(db_err("Row error"))?);
        }
        Ok(records)
    }

    pub fn get_policies_by_ids(&self, ids: &[String]) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        let sql = policy_select(&format!("p.alert_id IN ({})", placeholders(1, ids.len())));
        let mut stmt = conn.prepare(&sql).map_err(db_err("Query failed"))?;
        let rows = stmt
            .query_map(params_from_iter(ids.iter()), policy_from_row)
            .map_err(db_err("Query error"))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(db_err("Row error"))?);
        }
        Ok(records)
    }

    /// Move existing policy records to `to`; the alerts' exception follows.
    pub fn move_policies(&self, ids: &[String], to: Policy) -> Result<usize, AlertDeskError> {
        if ids.is_empty() {
            return Err(AlertDeskError::Validation("No records selected".into()));
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
        let in_list = placeholders(2, ids.len());

        let mut values: Vec<Value> = vec![Value::from(to.as_str().to_string())];
        values.extend(ids.iter().cloned().map(Value::from));

        let moved = tx
            .execute(
                &format!("UPDATE file_policies SET policy = ?1 WHERE alert_id IN ({})", in_list),
                params_from_iter(values.iter()),
            )
            .map_err(db_err("Update failed"))?;
        tx.execute(
            &format!(
                "UPDATE alerts SET exception = ?1 WHERE id IN (SELECT alert_id FROM file_policies WHERE alert_id IN ({}))",
                in_list
            ),
            params_from_iter(values.iter()),
        ).map_err(db_err("Update failed"))?;

        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(moved)
    }

    /// Delete policy records and reset the alerts' exception to `none`.
    pub fn remove_policies(&self, ids: &[String]) -> Result<usize, AlertDeskError> {
        if ids.is_empty() {
            return Err(AlertDeskError::Validation("No records selected".into()));
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
        let in_list = placeholders(1, ids.len());

        let removed = tx
            .execute(
                &format!("DELETE FROM file_policies WHERE alert_id IN ({})", in_list),
                params_from_iter(ids.iter()),
            )
            .map_err(db_err("Delete failed"))?;
        tx.execute(
            &format!("UPDATE alerts SET exception = 'none' WHERE id IN ({})", in_list),
            params_from_iter(ids.iter()),
        ).map_err(db_err("Update failed"))?;

        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::models::{AlertRecord, ExceptionKind, ListStatus, ProcessStatus, RiskScore, Verdict};

    fn alert(id: &str) -> AlertRecord {
        AlertRecord {
            id: id.to_string(),
            time: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
            file_name: "payload.dll".into(),
            server_ip: "172.16.0.4".into(),
            risk: RiskScore::new(55),
            verdict: Verdict::Malware,
            process_status: ProcessStatus::Quarantine,
            exception: ExceptionKind::None,
            memo: None,
            processed_by: Some("system".into()),
        }
    }

    fn with_policies() -> Database {
        let db = Database::in_memory().unwrap();
        db.insert_alerts(&[alert("w1"), alert("w2"), alert("b1")]).unwrap();
        db.set_exception(&["w1".into(), "w2".into()], ExceptionKind::Whitelist).unwrap();
        db.set_exception(&["b1".into()], ExceptionKind::Blacklist).unwrap();
        db
    }

    #[test]
    fn test_db_list_policies_by_list() {
        let db = with_policies();
        let white = db.list_policies(Policy::Whitelist).unwrap();
        assert_eq!(white.len(), 2);
        assert!(white.iter().all(|p| p.alert.exception == ExceptionKind::Whitelist));
        assert!(white.iter().all(|p| p.list_status == ListStatus::Enabled));
        assert_eq!(db.list_policies(Policy::Blacklist).unwrap().len(), 1);
    }

    #[test]
    fn test_db_move_round_trip() {
        let db = with_policies();
        assert_eq!(db.move_policies(&["w1".into()], Policy::Blacklist).unwrap(), 1);
        assert_eq!(db.get_alert("w1").unwrap().unwrap().exception, ExceptionKind::Blacklist);
        assert_eq!(db.list_policies(Policy::Blacklist).unwrap().len(), 2);

        db.move_policies(&["w1".into()], Policy::Whitelist).unwrap();
        let back = db.get_policies_by_ids(&["w1".into()]).unwrap();
        assert_eq!(back[0].policy, Policy::Whitelist);
        assert_eq!(db.list_policies(Policy::Whitelist).unwrap().len(), 2);
    }

    #[test]
    fn test_db_move_ignores_unlisted_alerts() {
        let db = with_policies();
        db.insert_alerts(&[alert("x9")]).unwrap();
        assert_eq!(db.move_policies(&["x9".into()], Policy::Blacklist).unwrap(), 0);
        assert_eq!(db.get_alert("x9").unwrap().unwrap().exception, ExceptionKind::None);
    }

    #[test]
    fn test_db_remove_policies() {
        let db = with_policies();
        assert_eq!(db.remove_policies(&["w2".into(), "b1".into()]).unwrap(), 2);
        assert_eq!(db.list_policies(Policy::Whitelist).unwrap().len(), 1);
        assert!(db.list_policies(Policy::Blacklist).unwrap().is_empty());
        assert_eq!(db.get_alert("b1").unwrap().unwrap().exception, ExceptionKind::None);
    }

    #[test]
    fn test_db_remove_empty_ids_rejected() {
        let db = with_policies();
        assert!(db.remove_policies(&[]).is_err());
    }
}

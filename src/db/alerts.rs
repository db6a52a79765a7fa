use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row, Transaction};
use crate::errors::AlertDeskError;
use crate::models::{AlertRecord, ExceptionKind, FilePolicyRecord, Policy, ProcessStatus, RiskScore};
use crate::selectors::{self, StatusSummary};
use super::connection::{db_err, parse_column, parse_time, placeholders};
use super::Database;

pub(crate) const ALERT_COLUMNS: &str =
    "a.id, a.time, a.file_name, a.server_ip, a.risk, a.verdict, a.process_status, a.exception, a.memo, a.processed_by";

/// Read the ten `ALERT_COLUMNS` starting at column 0.
pub(crate) fn alert_from_row(row: &Row) -> rusqlite::Result<AlertRecord> {
    let time: String = row.get(1)?;
    let verdict: String = row.get(5)?;
    let status: String = row.get(6)?;
    let exception: String = row.get(7)?;
    Ok(AlertRecord {
        id: row.get(0)?,
        time: parse_time(1, &time)?,
        file_name: row.get(2)?,
        server_ip: row.get(3)?,
        risk: RiskScore::new(row.get::<_, i64>(4)?.clamp(0, 100) as u8),
        verdict: parse_column(5, &verdict)?,
        process_status: parse_column(6, &status)?,
        exception: parse_column(7, &exception)?,
        memo: row.get(8)?,
        processed_by: row.get(9)?,
    })
}

fn insert_alert_tx(tx: &Transaction, alert: &AlertRecord) -> Result<(), AlertDeskError> {
    tx.execute(
        "INSERT OR REPLACE INTO alerts (id, time, file_name, server_ip, risk, verdict, process_status, exception, memo, processed_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            alert.id,
            alert.time.to_rfc3339(),
            alert.file_name,
            alert.server_ip,
            alert.risk.value() as i64,
            alert.verdict.as_str(),
            alert.process_status.as_str(),
            alert.exception.as_str(),
            alert.memo,
            alert.processed_by,
        ],
    ).map_err(db_err("Failed to insert alert"))?;
    Ok(())
}

impl Database {
    pub fn insert_alerts(&self, alerts: &[AlertRecord]) -> Result<usize, AlertDeskError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
        for alert in alerts {
            insert_alert_tx(&tx, alert)?;
        }
        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(alerts.len())
    }

    pub fn count_alerts(&self) -> Result<usize, AlertDeskError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM alerts", [], |row: &Row| row.get(0))
            .map_err(db_err("Query error"))?;
        Ok(count as usize)
    }

    pub fn get_alert(&self, id: &str) -> Result<Option<AlertRecord>, AlertDeskError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM alerts a WHERE a.id = ?1", ALERT_COLUMNS);
        match conn.query_row(&sql, params![id], alert_from_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AlertDeskError::Database(format!("Query error: {}", e))),
        }
    }

    /// Pending or processed alerts, newest first.
    pub fn list_alerts(&self, pending: bool) -> Result<Vec<AlertRecord>, AlertDeskError> {
        let conn = self.lock()?;
        let op = if pending { "=" } else { "!=" };
        let sql = format!(
            "SELECT {} FROM alerts a WHERE a.process_status {} 'pending' ORDER BY a.time DESC, a.id ASC",
            ALERT_COLUMNS, op
        );
        let mut stmt = conn.prepare(&sql).map_err(db_err("Query failed"))?;
        let rows = stmt.query_map([], alert_from_row).map_err(db_err("Query error"))?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row.map_err(db_err("Row error"))?);
        }
        Ok(alerts)
    }

    /// Apply `status` to the listed alerts that are still pending.
    ///
    /// Runs in one transaction; returns the number of rows affected. A
    /// `pending` target changes nothing and reports how many ids are pending.
    pub fn bulk_update_status(
        &self,
        ids: &[String],
        status: ProcessStatus,
        memo: &str,
        user_id: &str,
    ) -> Result<usize, AlertDeskError> {
        if ids.is_empty() {
            return Err(AlertDeskError::Validation("No records selected".into()));
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;

        let affected = if status == ProcessStatus::Pending {
            let sql = format!(
                "SELECT COUNT(*) FROM alerts WHERE process_status = 'pending' AND id IN ({})",
                placeholders(1, ids.len())
            );
            let count: i64 = tx
                .query_row(&sql, params_from_iter(ids.iter()), |row: &Row| row.get(0))
                .map_err(db_err("Query error"))?;
            count as usize
        } else {
            let sql = format!(
                "UPDATE alerts SET process_status = ?1, memo = ?2, processed_by = ?3, processed_at = ?4 WHERE process_status = 'pending' AND id IN ({})",
                placeholders(5, ids.len())
            );
            let mut values: Vec<Value> = vec![
                Value::from(status.as_str().to_string()),
                Value::from(Some(memo.to_string()).filter(|m| !m.is_empty())),
                Value::from(Some(user_id.to_string()).filter(|u| !u.is_empty())),
                Value::from(Utc::now().to_rfc3339()),
            ];
            values.extend(ids.iter().cloned().map(Value::from));
            tx.execute(&sql, params_from_iter(values.iter()))
                .map_err(db_err("Update failed"))?
        };

        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(affected)
    }

    /// Set the exception on alerts and keep `file_policies` in step.
    /// Returns the policy records that now exist for `ids`.
    pub fn set_exception(
        &self,
        ids: &[String],
        exception: ExceptionKind,
    ) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        if ids.is_empty() {
            return Err(AlertDeskError::Validation("No records selected".into()));
        }
        {
            let mut conn = self.lock()?;
            let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
            let in_list = placeholders(2, ids.len());

            let mut values: Vec<Value> = vec![Value::from(exception.as_str().to_string())];
            values.extend(ids.iter().cloned().map(Value::from));
            tx.execute(
                &format!("UPDATE alerts SET exception = ?1 WHERE id IN ({})", in_list),
                params_from_iter(values.iter()),
            ).map_err(db_err("Update failed"))?;

            match Policy::from_exception(exception) {
                Some(policy) => {
                    let mut values: Vec<Value> = vec![
                        Value::from(policy.as_str().to_string()),
                        Value::from(Utc::now().to_rfc3339()),
                    ];
                    values.extend(ids.iter().cloned().map(Value::from));
                    tx.execute(
                        &format!(
                            "INSERT INTO file_policies (alert_id, policy, list_status, created_at) SELECT id, ?1, 'enabled', ?2 FROM alerts WHERE id IN ({}) ON CONFLICT(alert_id) DO UPDATE SET policy = excluded.policy",
                            placeholders(3, ids.len())
                        ),
                        params_from_iter(values.iter()),
                    ).map_err(db_err("Insert failed"))?;
                }
                None => {
                    tx.execute(
                        &format!("DELETE FROM file_policies WHERE alert_id IN ({})", placeholders(1, ids.len())),
                        params_from_iter(ids.iter()),
                    ).map_err(db_err("Delete failed"))?;
                }
            }
            tx.commit().map_err(db_err("Commit failed"))?;
        }

        if exception == ExceptionKind::None {
            return Ok(Vec::new());
        }
        self.get_policies_by_ids(ids)
    }

    pub fn status_summary(&self) -> Result<StatusSummary, AlertDeskError> {
        let mut all = self.list_alerts(true)?;
        all.extend(self.list_alerts(false)?);
        Ok(selectors::summarize(&all))
    }
}

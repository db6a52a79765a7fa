use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use crate::errors::AlertDeskError;
use crate::models::ServerRecord;
use super::connection::{db_err, placeholders};
use super::Database;

impl Database {
    pub fn insert_servers(&self, servers: &[ServerRecord]) -> Result<(), AlertDeskError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
        for server in servers {
            tx.execute(
                "INSERT OR REPLACE INTO servers (id, server_ip, hostname, cluster, manager) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![server.id, server.server_ip, server.hostname, server.cluster, server.manager],
            ).map_err(db_err("Failed to insert server"))?;
        }
        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(())
    }

    pub fn list_servers(&self) -> Result<Vec<ServerRecord>, AlertDeskError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, server_ip, hostname, cluster, manager FROM servers ORDER BY hostname ASC")
            .map_err(db_err("Query failed"))?;
        let rows = stmt
            .query_map([], |row: &Row| {
                Ok(ServerRecord {
                    id: row.get(0)?,
                    server_ip: row.get(1)?,
                    hostname: row.get(2)?,
                    cluster: row.get(3)?,
                    manager: row.get(4)?,
                })
            })
            .map_err(db_err("Query error"))?;

        let mut servers = Vec::new();
        for row in rows {
            servers.push(row.map_err(db_err("Row error"))?);
        }
        Ok(servers)
    }

    /// Set cluster and/or manager on the listed servers; `None` keeps the current value.
    pub fn assign_servers(
        &self,
        ids: &[String],
        cluster: Option<&str>,
        manager: Option<&str>,
    ) -> Result<usize, AlertDeskError> {
        if ids.is_empty() {
            return Err(AlertDeskError::Validation("No servers selected".into()));
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;

        let mut values: Vec<Value> = vec![
            Value::from(cluster.map(str::to_string)),
            Value::from(manager.map(str::to_string)),
        ];
        values.extend(ids.iter().cloned().map(Value::from));
        let updated = tx
            .execute(
                &format!(
                    "UPDATE servers SET cluster = COALESCE(?1, cluster), manager = COALESCE(?2, manager) WHERE id IN ({})",
                    placeholders(3, ids.len())
                ),
                params_from_iter(values.iter()),
            )
            .map_err(db_err("Update failed"))?;

        tx.commit().map_err(db_err("Commit failed"))?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sample_servers;

    #[test]
    fn test_db_insert_and_list_servers() {
        let db = Database::in_memory().unwrap();
        db.insert_servers(&sample_servers()).unwrap();
        let servers = db.list_servers().unwrap();
        assert_eq!(servers.len(), sample_servers().len());
        assert_eq!(servers[0].hostname, "srv-01");
    }

    #[test]
    fn test_db_assign_keeps_unspecified_field() {
        let db = Database::in_memory().unwrap();
        db.insert_servers(&sample_servers()).unwrap();

        let updated = db.assign_servers(&["server-1".into(), "server-4".into()], None, Some("mgr-gamma")).unwrap();
        assert_eq!(updated, 2);

        let servers = db.list_servers().unwrap();
        let s1 = servers.iter().find(|s| s.id == "server-1").unwrap();
        assert_eq!(s1.cluster.as_deref(), Some("prod-east"));
        assert_eq!(s1.manager.as_deref(), Some("mgr-gamma"));
        let s4 = servers.iter().find(|s| s.id == "server-4").unwrap();
        assert!(s4.cluster.is_none());
        assert_eq!(s4.manager.as_deref(), Some("mgr-gamma"));
    }

    #[test]
    fn test_db_assign_unknown_server() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.assign_servers(&["ghost".into()], Some("c"), None).unwrap(), 0);
    }
}

use tracing::info;
use crate::demo::DemoDataset;
use crate::errors::AlertDeskError;
use crate::models::Policy;
use super::Database;

impl Database {
    /// Fill an empty database with `count` demo alerts and the sample servers.
    /// Returns the number of alerts inserted; an already populated database is left alone.
    pub fn seed_demo(&self, count: usize, seed: u64) -> Result<usize, AlertDeskError> {
        if self.count_alerts()? > 0 {
            info!("Database already has alerts, skipping seed");
            return Ok(0);
        }
        let data = DemoDataset::generate(count, seed);
        self.insert_alerts(&data.alerts)?;
        self.insert_servers(&data.servers)?;

        for policy in [Policy::Blacklist, Policy::Whitelist] {
            let ids: Vec<String> = data
                .policies
                .iter()
                .filter(|p| p.policy == policy)
                .map(|p| p.id().to_string())
                .collect();
            if !ids.is_empty() {
                self.set_exception(&ids, policy.as_exception())?;
            }
        }

        info!(alerts = data.alerts.len(), policies = data.policies.len(), "Seeded demo data");
        Ok(data.alerts.len())
    }
}

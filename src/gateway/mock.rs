use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use crate::config::MockConfig;
use crate::demo::DemoDataset;
use crate::errors::AlertDeskError;
use crate::models::{
    AlertQuery, AlertRecord, BulkActionRequest, BulkOutcome, ExceptionKind, ExceptionRequest,
    FilePolicyRecord, Page, PageRequest, Policy, PolicyMoveRequest, PolicyRemoveRequest,
    ServerAssignment, ServerRecord,
};
use crate::selectors;
use super::AlertGateway;

pub const SIMULATED_FAILURE: &str = "simulated network failure";

/// In-memory backend with fixed latency and random failure injection.
///
/// Stands in for the real service during UI development and in tests.
pub struct MockGateway {
    data: Mutex<DemoDataset>,
    rng: Mutex<StdRng>,
    latency: Duration,
    failure_rate: f64,
}

impl MockGateway {
    pub fn new(data: DemoDataset, latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self {
            data: Mutex::new(data),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &MockConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::new(
            DemoDataset::generate(config.dataset_size, seed),
            Duration::from_millis(config.latency_ms),
            config.failure_rate,
            seed,
        )
    }

    /// Never fails and never sleeps.
    pub fn reliable(data: DemoDataset) -> Self {
        Self::new(data, Duration::ZERO, 0.0, 0)
    }

    pub fn with_alerts(alerts: Vec<AlertRecord>) -> Self {
        let policies = alerts
            .iter()
            .filter_map(|a| {
                Policy::from_exception(a.exception).map(|p| FilePolicyRecord::promote(a.clone(), p))
            })
            .collect();
        Self::reliable(DemoDataset {
            alerts,
            policies,
            servers: crate::demo::sample_servers(),
        })
    }

    /// Copy of the backing data, for assertions.
    pub fn dataset(&self) -> DemoDataset {
        self.data().clone()
    }

    async fn round_trip(&self, operation: &str) -> Result<(), AlertDeskError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let fail = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate)
        };
        if fail {
            warn!(operation, "Injected mock failure");
            return Err(AlertDeskError::Network(SIMULATED_FAILURE.into()));
        }
        debug!(operation, "Mock round trip");
        Ok(())
    }

    fn data(&self) -> std::sync::MutexGuard<'_, DemoDataset> {
        self.data.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn query_alerts(&self, query: &AlertQuery, pending: bool) -> Page<AlertRecord> {
        let data = self.data();
        let mut matching: Vec<AlertRecord> = selectors::filter_alerts(
            data.alerts.iter().filter(|a| a.is_pending() == pending),
            &query.filters(),
        )
        .into_iter()
        .cloned()
        .collect();
        selectors::sort_newest_first(&mut matching);
        selectors::paginate(&matching, query.page())
    }
}

#[async_trait]
impl AlertGateway for MockGateway {
    async fn fetch_pending(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError> {
        self.round_trip("fetch_pending").await?;
        Ok(self.query_alerts(query, true))
    }

    async fn fetch_completed(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError> {
        self.round_trip("fetch_completed").await?;
        Ok(self.query_alerts(query, false))
    }

    async fn fetch_detection(&self, id: &str) -> Result<AlertRecord, AlertDeskError> {
        self.round_trip("fetch_detection").await?;
        self.data()
            .alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AlertDeskError::NotFound(format!("Detection {} not found", id)))
    }

    async fn bulk_process(&self, request: &BulkActionRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.round_trip("bulk_process").await?;

        let mut data = self.data();
        let mut updated = 0;
        for alert in data.alerts.iter_mut().filter(|a| request.selected_ids.contains(&a.id)) {
            if !alert.process_status.can_transition_to(request.action) {
                continue;
            }
            if alert.process_status != request.action {
                alert.process_status = request.action;
                alert.memo = Some(request.memo.clone()).filter(|m| !m.is_empty());
                alert.processed_by = Some(request.user_id.clone()).filter(|u| !u.is_empty());
            }
            updated += 1;
        }
        Ok(BulkOutcome { updated })
    }

    async fn set_exception(
        &self,
        request: &ExceptionRequest,
    ) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        request.validate()?;
        self.round_trip("set_exception").await?;

        let mut data = self.data();
        let DemoDataset { alerts, policies, .. } = &mut *data;
        policies.retain(|p| !request.ids.contains(&p.alert.id));

        let mut created = Vec::new();
        for alert in alerts.iter_mut().filter(|a| request.ids.contains(&a.id)) {
            alert.exception = request.exception;
            if let Some(policy) = Policy::from_exception(request.exception) {
                let record = FilePolicyRecord::promote(alert.clone(), policy);
                policies.push(record.clone());
                created.push(record);
            }
        }
        Ok(created)
    }

    async fn fetch_policies(
        &self,
        policy: Policy,
        page: PageRequest,
    ) -> Result<Page<FilePolicyRecord>, AlertDeskError> {
        self.round_trip("fetch_policies").await?;
        let data = self.data();
        let mut matching: Vec<FilePolicyRecord> = selectors::policy_queue(&data.policies, policy)
            .into_iter()
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id().cmp(b.id())));
        Ok(selectors::paginate(&matching, page))
    }

    async fn bulk_move(&self, request: &PolicyMoveRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.round_trip("bulk_move").await?;

        let mut data = self.data();
        let DemoDataset { alerts, policies, .. } = &mut *data;
        let mut updated = 0;
        for record in policies.iter_mut().filter(|p| request.ids.contains(&p.alert.id)) {
            record.set_policy(request.policy);
            updated += 1;
        }
        for alert in alerts.iter_mut().filter(|a| request.ids.contains(&a.id)) {
            alert.exception = request.policy.as_exception();
        }
        Ok(BulkOutcome { updated })
    }

    async fn bulk_remove(&self, request: &PolicyRemoveRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.round_trip("bulk_remove").await?;

        let mut data = self.data();
        let DemoDataset { alerts, policies, .. } = &mut *data;
        let before = policies.len();
        policies.retain(|p| !request.ids.contains(&p.alert.id));
        for alert in alerts.iter_mut().filter(|a| request.ids.contains(&a.id)) {
            alert.exception = ExceptionKind::None;
        }
        Ok(BulkOutcome { updated: before - policies.len() })
    }

    async fn list_servers(&self) -> Result<Vec<ServerRecord>, AlertDeskError> {
        self.round_trip("list_servers").await?;
        Ok(self.data().servers.clone())
    }

    async fn assign_servers(&self, request: &ServerAssignment) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.round_trip("assign_servers").await?;

        let mut data = self.data();
        let mut updated = 0;
        for server in data.servers.iter_mut().filter(|s| request.ids.contains(&s.id)) {
            if let Some(cluster) = &request.cluster {
                server.cluster = Some(cluster.clone());
            }
            if let Some(manager) = &request.manager {
                server.manager = Some(manager.clone());
            }
            updated += 1;
        }
        Ok(BulkOutcome { updated })
    }

    fn gateway_name(&self) -> &str {
        "mock"
    }
}

impl std::fmt::Debug for MockGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGateway")
            .field("latency", &self.latency)
            .field("failure_rate", &self.failure_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertFilters, ProcessStatus, RiskBucket};

    fn gateway() -> MockGateway {
        MockGateway::reliable(DemoDataset::generate(60, 42))
    }

    #[tokio::test]
    async fn test_fetch_pending_only_returns_pending() {
        let gw = gateway();
        let page = gw.fetch_pending(&AlertQuery::new(&AlertFilters::default(), PageRequest::new(1, 100))).await.unwrap();
        assert!(!page.data.is_empty());
        assert!(page.data.iter().all(|a| a.is_pending()));
        assert_eq!(page.total, page.data.len());
    }

    #[tokio::test]
    async fn test_fetch_pending_applies_filters() {
        let gw = gateway();
        let filters = AlertFilters::default().with_risk(RiskBucket::High);
        let page = gw.fetch_pending(&AlertQuery::new(&filters, PageRequest::new(1, 100))).await.unwrap();
        assert!(page.data.iter().all(|a| a.risk.value() >= 80));
    }

    #[tokio::test]
    async fn test_bulk_process_moves_to_completed() {
        let gw = gateway();
        let query = AlertQuery::new(&AlertFilters::default(), PageRequest::new(1, 100));
        let pending = gw.fetch_pending(&query).await.unwrap();
        let id = pending.data[0].id.clone();

        let outcome = gw
            .bulk_process(&BulkActionRequest::new(vec![id.clone()], ProcessStatus::Quarantine, "", "u1"))
            .await
            .unwrap();
        assert_eq!(outcome.updated, 1);

        let after = gw.fetch_pending(&query).await.unwrap();
        assert_eq!(after.total, pending.total - 1);
        let detection = gw.fetch_detection(&id).await.unwrap();
        assert_eq!(detection.process_status, ProcessStatus::Quarantine);
        assert_eq!(detection.processed_by.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_always_failing_gateway() {
        let gw = MockGateway::new(DemoDataset::generate(5, 1), Duration::ZERO, 1.0, 3);
        let err = gw.list_servers().await.unwrap_err();
        assert!(matches!(err, AlertDeskError::Network(ref m) if m == SIMULATED_FAILURE));
    }

    #[tokio::test]
    async fn test_failure_rate_is_roughly_honoured() {
        let gw = MockGateway::new(DemoDataset::generate(5, 1), Duration::ZERO, 0.1, 99);
        let mut failures = 0;
        for _ in 0..1000 {
            if gw.list_servers().await.is_err() {
                failures += 1;
            }
        }
        assert!((50..=150).contains(&failures), "failures = {}", failures);
    }

    #[tokio::test]
    async fn test_missing_detection() {
        let gw = gateway();
        assert!(matches!(gw.fetch_detection("nope").await, Err(AlertDeskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_exception_then_remove() {
        let gw = gateway();
        let id = gw.dataset().alerts[0].id.clone();
        let created = gw
            .set_exception(&ExceptionRequest { ids: vec![id.clone()], exception: ExceptionKind::Blacklist })
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].policy, Policy::Blacklist);

        let removed = gw.bulk_remove(&PolicyRemoveRequest { ids: vec![id.clone()] }).await.unwrap();
        assert_eq!(removed.updated, 1);
        let data = gw.dataset();
        assert!(data.policies.iter().all(|p| p.alert.id != id));
        assert_eq!(data.alerts[0].exception, ExceptionKind::None);
    }
}

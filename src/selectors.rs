//! Queue views derived from the flat record collections.
//!
//! Every view is recomputed on demand by a linear scan; nothing here is stored.

use std::collections::BTreeMap;
use serde::Serialize;
use crate::models::{
    AlertFilters, AlertRecord, ExceptionKind, FilePolicyRecord, Page, PageRequest, Policy,
    ProcessStatus, Verdict,
};

pub fn pending_queue(records: &[AlertRecord]) -> Vec<&AlertRecord> {
    records.iter().filter(|r| r.is_pending()).collect()
}

/// Records that already received a disposition.
pub fn completed_queue(records: &[AlertRecord]) -> Vec<&AlertRecord> {
    records.iter().filter(|r| !r.is_pending()).collect()
}

pub fn policy_queue(records: &[FilePolicyRecord], policy: Policy) -> Vec<&FilePolicyRecord> {
    records.iter().filter(|r| r.policy == policy).collect()
}

pub fn blacklist_queue(records: &[FilePolicyRecord]) -> Vec<&FilePolicyRecord> {
    policy_queue(records, Policy::Blacklist)
}

pub fn whitelist_queue(records: &[FilePolicyRecord]) -> Vec<&FilePolicyRecord> {
    policy_queue(records, Policy::Whitelist)
}

pub fn filter_alerts<'a, I>(records: I, filters: &AlertFilters) -> Vec<&'a AlertRecord>
where
    I: IntoIterator<Item = &'a AlertRecord>,
{
    records.into_iter().filter(|r| filters.matches(r)).collect()
}

/// Cut one page out of an already filtered list. `total` is the unpaged length.
pub fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let data = items
        .iter()
        .skip(page.offset())
        .take(page.page_size)
        .cloned()
        .collect();
    Page {
        data,
        total: items.len(),
        current: page.current,
        page_size: page.page_size,
    }
}

/// Newest first; ties broken by id so the order is stable across reloads.
pub fn sort_newest_first(records: &mut [AlertRecord]) {
    records.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.id.cmp(&b.id)));
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub pending: usize,
    pub no_action: usize,
    pub quarantine: usize,
    pub delete: usize,
    pub blacklist: usize,
    pub whitelist: usize,
    pub by_verdict: BTreeMap<String, usize>,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.pending + self.no_action + self.quarantine + self.delete
    }
}

pub fn summarize<'a, I>(records: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a AlertRecord>,
{
    let mut summary = StatusSummary::default();
    for record in records {
        match record.process_status {
            ProcessStatus::Pending => summary.pending += 1,
            ProcessStatus::NoAction => summary.no_action += 1,
            ProcessStatus::Quarantine => summary.quarantine += 1,
            ProcessStatus::Delete => summary.delete += 1,
        }
        match record.exception {
            ExceptionKind::Blacklist => summary.blacklist += 1,
            ExceptionKind::Whitelist => summary.whitelist += 1,
            ExceptionKind::None => {}
        }
        *summary
            .by_verdict
            .entry(record.verdict.as_str().to_string())
            .or_insert(0) += 1;
    }
    for verdict in [Verdict::Malware, Verdict::Benign, Verdict::Suspicious, Verdict::Unknown] {
        summary.by_verdict.entry(verdict.as_str().to_string()).or_insert(0);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crate::models::{RiskBucket, RiskScore};

    fn record(id: &str, risk: u8, verdict: Verdict, ip: &str, status: ProcessStatus) -> AlertRecord {
        AlertRecord {
            id: id.to_string(),
            time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            file_name: format!("{}.bin", id),
            server_ip: ip.to_string(),
            risk: RiskScore::new(risk),
            verdict,
            process_status: status,
            exception: ExceptionKind::None,
            memo: None,
            processed_by: None,
        }
    }

    fn fixture() -> Vec<AlertRecord> {
        vec![
            record("a1", 95, Verdict::Malware, "10.0.0.1", ProcessStatus::Pending),
            record("a2", 85, Verdict::Suspicious, "10.0.0.2", ProcessStatus::Pending),
            record("a3", 60, Verdict::Malware, "10.0.0.1", ProcessStatus::Pending),
            record("a4", 20, Verdict::Benign, "10.0.0.3", ProcessStatus::Delete),
            record("a5", 81, Verdict::Malware, "10.0.0.2", ProcessStatus::Quarantine),
        ]
    }

    fn ids(records: &[&AlertRecord]) -> Vec<String> {
        let mut ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_pending_and_completed_partition() {
        let records = fixture();
        let pending = ids(&pending_queue(&records));
        let completed = ids(&completed_queue(&records));
        assert_eq!(pending, vec!["a1", "a2", "a3"]);
        assert_eq!(completed, vec!["a4", "a5"]);
        for r in &records {
            assert!(pending.contains(&r.id) ^ completed.contains(&r.id));
        }
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let records = fixture();
        let high = AlertFilters::default().with_risk(RiskBucket::High);
        let malware = AlertFilters::default().with_verdict(Verdict::Malware);

        let risk_first = filter_alerts(filter_alerts(&records, &high), &malware);
        let verdict_first = filter_alerts(filter_alerts(&records, &malware), &high);
        let combined = filter_alerts(
            &records,
            &AlertFilters::default().with_risk(RiskBucket::High).with_verdict(Verdict::Malware),
        );

        assert_eq!(ids(&risk_first), ids(&verdict_first));
        assert_eq!(ids(&risk_first), ids(&combined));
        assert_eq!(ids(&combined), vec!["a1", "a5"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let records = fixture();
        let filters = AlertFilters::default()
            .with_verdict(Verdict::Malware)
            .with_server_ip("10.0.0.1");
        assert_eq!(ids(&filter_alerts(&records, &filters)), vec!["a1", "a3"]);

        let none = AlertFilters::default()
            .with_risk(RiskBucket::Low)
            .with_verdict(Verdict::Malware);
        assert!(filter_alerts(&records, &none).is_empty());
    }

    #[test]
    fn test_empty_filters_match_all() {
        let records = fixture();
        assert_eq!(filter_alerts(&records, &AlertFilters::default()).len(), records.len());
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, PageRequest::new(2, 3));
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.total, 7);

        let last = paginate(&items, PageRequest::new(3, 3));
        assert_eq!(last.data, vec![7]);

        let beyond = paginate(&items, PageRequest::new(9, 3));
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 7);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = fixture();
        records[2].time = records[2].time + Duration::hours(1);
        sort_newest_first(&mut records);
        assert_eq!(records[0].id, "a3");
        assert_eq!(records[1].id, "a1");
    }

    #[test]
    fn test_summarize_counts() {
        let mut records = fixture();
        records[3].exception = ExceptionKind::Whitelist;
        let summary = summarize(&records);
        assert_eq!(summary.pending, 3);
        assert_eq!(summary.delete, 1);
        assert_eq!(summary.quarantine, 1);
        assert_eq!(summary.whitelist, 1);
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.by_verdict["Malware"], 3);
        assert_eq!(summary.by_verdict["Unknown"], 0);
    }
}

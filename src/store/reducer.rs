use std::collections::HashSet;
use tracing::debug;
use crate::models::{AlertRecord, ExceptionKind, FilePolicyRecord, Policy, ProcessStatus};
use crate::selectors;
use super::command::Command;
use super::state::{AlertSlice, ConsoleState, PolicySlice, ServerSlice, Slice};

/// Apply one command. Pure and synchronous: no I/O, no awaiting.
pub fn reduce(state: &mut ConsoleState, command: Command) {
    match command {
        Command::PendingRequested { filters, page } => {
            let alerts = &mut state.alerts;
            if alerts.filters != filters {
                alerts.selected_row_keys.clear();
            }
            alerts.filters = filters;
            alerts.page = page;
            alerts.loading = true;
            alerts.error = None;
        }
        Command::PendingLoaded(page) => {
            let alerts = &mut state.alerts;
            alerts.records.retain(|r| !r.is_pending());
            replace_records(&mut alerts.records, page.data);
            alerts.pending_total = page.total;
            alerts.page.current = page.current;
            alerts.loading = false;
        }
        Command::CompletedRequested { .. } => {
            state.alerts.loading = true;
            state.alerts.error = None;
        }
        Command::CompletedLoaded(page) => {
            let alerts = &mut state.alerts;
            alerts.records.retain(|r| r.is_pending());
            replace_records(&mut alerts.records, page.data);
            alerts.completed_total = page.total;
            alerts.loading = false;
        }
        Command::FiltersChanged(filters) => {
            if state.alerts.filters != filters {
                state.alerts.selected_row_keys.clear();
            }
            state.alerts.filters = filters;
        }
        Command::DetectionLoaded(record) => {
            replace_records(&mut state.alerts.records, vec![record.clone()]);
            state.alerts.detection = Some(record);
            state.alerts.loading = false;
        }
        Command::RecordsMerged(records) => {
            replace_records(&mut state.alerts.records, records);
        }
        Command::AlertsFailed(error) => {
            state.alerts.loading = false;
            state.alerts.error = Some(error);
        }
        Command::SetSelectedRowKeys(keys) => {
            state.alerts.selected_row_keys = keys;
        }
        Command::ClearSelectedRows => {
            state.alerts.selected_row_keys.clear();
        }
        Command::BulkProcessStarted => {
            state.alerts.loading = true;
            state.alerts.error = None;
        }
        Command::BulkProcessSucceeded { ids, action, memo, user_id } => {
            apply_bulk_process(&mut state.alerts, &ids, action, &memo, &user_id);
        }
        Command::BulkProcessFailed(error) => {
            state.alerts.loading = false;
            state.alerts.error = Some(error);
        }
        Command::ExceptionApplied { ids, exception, records } => {
            apply_exception(state, &ids, exception, records);
        }
        Command::PoliciesRequested | Command::PolicyMutationStarted => {
            state.policies.loading = true;
            state.policies.error = None;
        }
        Command::PoliciesLoaded { policy, page } => {
            let policies = &mut state.policies;
            policies.records.retain(|r| r.policy != policy);
            policies.records.extend(page.data);
            *policies.total_for_mut(policy) = page.total;
            policies.loading = false;
        }
        Command::SetSelectedPolicies(keys) => {
            state.policies.selected_row_keys = keys;
        }
        Command::PoliciesMoved { ids, to } => {
            let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            move_policies(&mut state.policies, &ids, to);
            mirror_exception(&mut state.alerts, &ids, to.as_exception());
        }
        Command::PoliciesRemoved { ids } => {
            let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            remove_policies(&mut state.policies, &ids);
            mirror_exception(&mut state.alerts, &ids, ExceptionKind::None);
        }
        Command::PoliciesFailed(error) => {
            state.policies.loading = false;
            state.policies.error = Some(error);
        }
        Command::ServersRequested => {
            state.servers.loading = true;
            state.servers.error = None;
        }
        Command::ServersLoaded(records) => {
            state.servers.records = records;
            state.servers.loading = false;
        }
        Command::SetSelectedServers(keys) => {
            state.servers.selected_row_keys = keys;
        }
        Command::ServersAssigned { ids, cluster, manager } => {
            assign_servers(&mut state.servers, &ids, cluster, manager);
        }
        Command::ServersFailed(error) => {
            state.servers.loading = false;
            state.servers.error = Some(error);
        }
        Command::ClearError(slice) => match slice {
            Slice::Alerts => state.alerts.error = None,
            Slice::Policies => state.policies.error = None,
            Slice::Servers => state.servers.error = None,
        },
    }
}

/// Insert `incoming`, replacing any record with the same id, and keep newest-first order.
fn replace_records(records: &mut Vec<AlertRecord>, incoming: Vec<AlertRecord>) {
    let incoming_ids: HashSet<String> = incoming.iter().map(|r| r.id.clone()).collect();
    records.retain(|r| !incoming_ids.contains(&r.id));
    records.extend(incoming);
    selectors::sort_newest_first(records);
}

fn apply_bulk_process(
    alerts: &mut AlertSlice,
    ids: &[String],
    action: ProcessStatus,
    memo: &str,
    user_id: &str,
) {
    alerts.loading = false;
    alerts.selected_row_keys.clear();

    // Re-marking as pending changes nothing but the selection.
    if action == ProcessStatus::Pending {
        return;
    }

    let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut moved = 0usize;
    for record in alerts.records.iter_mut().filter(|r| ids.contains(r.id.as_str())) {
        if !record.process_status.can_transition_to(action) {
            debug!(id = %record.id, from = %record.process_status, to = %action, "Skipping terminal record");
            continue;
        }
        record.process_status = action;
        record.memo = (!memo.is_empty()).then(|| memo.to_string());
        record.processed_by = (!user_id.is_empty()).then(|| user_id.to_string());
        moved += 1;
    }

    if let Some(detection) = alerts.detection.as_mut() {
        if ids.contains(detection.id.as_str()) && detection.process_status.can_transition_to(action) {
            detection.process_status = action;
        }
    }

    alerts.pending_total = alerts.pending_total.saturating_sub(moved);
    alerts.completed_total += moved;
}

fn apply_exception(
    state: &mut ConsoleState,
    ids: &[String],
    exception: ExceptionKind,
    records: Vec<FilePolicyRecord>,
) {
    let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
    mirror_exception(&mut state.alerts, &id_set, exception);
    state.alerts.loading = false;

    let policies = &mut state.policies;
    match Policy::from_exception(exception) {
        None => remove_policies(policies, &id_set),
        Some(_) => {
            for record in records {
                let policy = record.policy;
                match policies.records.iter().position(|r| r.id() == record.id()) {
                    Some(idx) => {
                        let previous = policies.records[idx].policy;
                        policies.records[idx] = record;
                        if previous != policy {
                            let total = policies.total_for_mut(previous);
                            *total = total.saturating_sub(1);
                            *policies.total_for_mut(policy) += 1;
                        }
                    }
                    None => {
                        *policies.total_for_mut(policy) += 1;
                        policies.records.push(record);
                    }
                }
            }
        }
    }
}

fn mirror_exception(alerts: &mut AlertSlice, ids: &HashSet<&str>, exception: ExceptionKind) {
    for record in alerts.records.iter_mut().filter(|r| ids.contains(r.id.as_str())) {
        record.exception = exception;
    }
    if let Some(detection) = alerts.detection.as_mut() {
        if ids.contains(detection.id.as_str()) {
            detection.exception = exception;
        }
    }
}

fn move_policies(policies: &mut PolicySlice, ids: &HashSet<&str>, to: Policy) {
    let mut moved = 0usize;
    for record in policies.records.iter_mut().filter(|r| ids.contains(r.id())) {
        if record.policy != to {
            record.set_policy(to);
            moved += 1;
        }
    }
    let from = policies.total_for_mut(to.opposite());
    *from = from.saturating_sub(moved);
    *policies.total_for_mut(to) += moved;
    policies.selected_row_keys.clear();
    policies.loading = false;
}

fn remove_policies(policies: &mut PolicySlice, ids: &HashSet<&str>) {
    let mut removed = Vec::new();
    policies.records.retain(|r| {
        if ids.contains(r.id()) {
            removed.push(r.policy);
            false
        } else {
            true
        }
    });
    for policy in removed {
        let total = policies.total_for_mut(policy);
        *total = total.saturating_sub(1);
    }
    policies.selected_row_keys.clear();
    policies.loading = false;
}

fn assign_servers(
    servers: &mut ServerSlice,
    ids: &[String],
    cluster: Option<String>,
    manager: Option<String>,
) {
    for server in servers.records.iter_mut().filter(|s| ids.contains(&s.id)) {
        if let Some(cluster) = &cluster {
            server.cluster = Some(cluster.clone());
        }
        if let Some(manager) = &manager {
            server.manager = Some(manager.clone());
        }
    }
    servers.selected_row_keys.clear();
    servers.loading = false;
}

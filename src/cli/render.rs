use console::style;
use serde::Serialize;
use crate::errors::AlertDeskError;
use crate::models::{AlertRecord, FilePolicyRecord, Page, ProcessStatus, RiskBucket, ServerRecord, Verdict};
use crate::notifications::{Level, Notification};
use crate::selectors::StatusSummary;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AlertDeskError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn risk_cell(record: &AlertRecord) -> String {
    let text = format!("{:>4}", record.risk.to_string());
    match record.risk.bucket() {
        RiskBucket::High => style(text).red().bold().to_string(),
        RiskBucket::Medium => style(text).yellow().to_string(),
        RiskBucket::Low => style(text).green().to_string(),
    }
}

fn verdict_cell(verdict: Verdict) -> String {
    let text = format!("{:<10}", verdict.as_str());
    match verdict {
        Verdict::Malware => style(text).red().to_string(),
        Verdict::Suspicious => style(text).yellow().to_string(),
        Verdict::Benign => style(text).green().to_string(),
        Verdict::Unknown => style(text).dim().to_string(),
    }
}

fn status_cell(status: ProcessStatus) -> String {
    let text = format!("{:<10}", status.as_str());
    match status {
        ProcessStatus::Pending => style(text).cyan().to_string(),
        ProcessStatus::Delete => style(text).red().to_string(),
        ProcessStatus::Quarantine => style(text).yellow().to_string(),
        ProcessStatus::NoAction => style(text).dim().to_string(),
    }
}

fn alert_row(record: &AlertRecord) -> String {
    format!(
        "{:<10} {}  {:<22} {:<15} {} {} {} {:<9}",
        record.id,
        record.time.format("%Y-%m-%d %H:%M"),
        truncate(&record.file_name, 22),
        record.server_ip,
        risk_cell(record),
        verdict_cell(record.verdict),
        status_cell(record.process_status),
        record.exception.as_str(),
    )
}

fn alert_header() -> String {
    style(format!(
        "{:<10} {:<16}  {:<22} {:<15} {:>4} {:<10} {:<10} {:<9}",
        "ID", "TIME", "FILE", "SERVER", "RISK", "VERDICT", "STATUS", "EXCEPTION"
    ))
    .bold()
    .to_string()
}

fn footer<T>(page: &Page<T>) {
    println!(
        "{}",
        style(format!(
            "page {} · {} of {} shown",
            page.current,
            page.data.len(),
            page.total
        ))
        .dim()
    );
}

pub fn print_alert_page(title: &str, page: &Page<AlertRecord>) {
    println!("{}", style(title).white().bold());
    if page.data.is_empty() {
        println!("  {}", style("no alerts").dim());
        return;
    }
    println!("{}", alert_header());
    for record in &page.data {
        println!("{}", alert_row(record));
    }
    footer(page);
}

pub fn print_detection(record: &AlertRecord) {
    println!("{}  {}", style("Detection").white().bold(), style(&record.id).cyan());
    println!("  {:<13} {}", "time", record.time.to_rfc3339());
    println!("  {:<13} {}", "file", record.file_name);
    println!("  {:<13} {}", "server", record.server_ip);
    println!("  {:<13} {}", "risk", risk_cell(record).trim());
    println!("  {:<13} {}", "verdict", verdict_cell(record.verdict).trim());
    println!("  {:<13} {}", "status", status_cell(record.process_status).trim());
    println!("  {:<13} {}", "exception", record.exception);
    if let Some(memo) = &record.memo {
        println!("  {:<13} {}", "memo", memo);
    }
    if let Some(user) = &record.processed_by {
        println!("  {:<13} {}", "processed by", user);
    }
}

pub fn print_policy_page(title: &str, page: &Page<FilePolicyRecord>) {
    println!("{}", style(title).white().bold());
    if page.data.is_empty() {
        println!("  {}", style("no policies").dim());
        return;
    }
    println!(
        "{}",
        style(format!(
            "{:<10} {:<22} {:<15} {:<9} {:<8} {}",
            "ID", "FILE", "SERVER", "POLICY", "STATUS", "ADDED"
        ))
        .bold()
    );
    for record in &page.data {
        println!(
            "{:<10} {:<22} {:<15} {:<9} {:<8} {}",
            record.id(),
            truncate(&record.alert.file_name, 22),
            record.alert.server_ip,
            record.policy.as_str(),
            record.list_status.as_str(),
            record.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    footer(page);
}

pub fn print_servers(servers: &[ServerRecord]) {
    println!(
        "{}",
        style(format!("{:<10} {:<12} {:<15} {:<12} {}", "ID", "HOST", "IP", "CLUSTER", "MANAGER")).bold()
    );
    for server in servers {
        let dash = || style("-").dim().to_string();
        println!(
            "{:<10} {:<12} {:<15} {:<12} {}",
            server.id,
            server.hostname,
            server.server_ip,
            server.cluster.clone().unwrap_or_else(dash),
            server.manager.clone().unwrap_or_else(dash),
        );
    }
}

pub fn print_summary(summary: &StatusSummary) {
    println!("{}", style("Alert summary").white().bold());
    let rows = [
        ("pending", summary.pending),
        ("no_action", summary.no_action),
        ("quarantine", summary.quarantine),
        ("delete", summary.delete),
    ];
    for (label, count) in rows {
        println!("  {:<12} {:>5}", label, count);
    }
    println!("  {:<12} {:>5}", style("total").bold(), summary.total());
    println!();
    println!("  {:<12} {:>5}", "blacklist", summary.blacklist);
    println!("  {:<12} {:>5}", "whitelist", summary.whitelist);
    println!();
    for (verdict, count) in &summary.by_verdict {
        println!("  {:<12} {:>5}", verdict, count);
    }
}

/// Print queued toasts to stderr so they never mix with JSON output.
pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        let marker = match n.level {
            Level::Success => style("\u{2714}").green().bold(),
            Level::Info => style("i").cyan(),
            Level::Warning => style("\u{26a0}").yellow(),
            Level::Error => style("\u{2716}").red().bold(),
        };
        eprintln!("{} {}", marker, n.message);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

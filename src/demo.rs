//! Deterministic sample data for the mock gateway and `serve --seed`.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::{
    AlertRecord, ExceptionKind, FilePolicyRecord, Policy, ProcessStatus, RiskScore,
    ServerRecord, Verdict,
};

const FILE_NAMES: &[&str] = &[
    "invoice_2024.pdf.exe",
    "setup_x64.msi",
    "payroll.xlsm",
    "update.ps1",
    "libcrypt.so.1",
    "chrome_installer.exe",
    "readme.docm",
    "backup.tar.gz",
    "svchost32.exe",
    "drivers.sys",
    "report_q3.zip",
    "loader.dll",
];

const SERVERS: &[(&str, &str, Option<&str>, Option<&str>)] = &[
    ("srv-01", "10.20.0.11", Some("prod-east"), Some("mgr-alpha")),
    ("srv-02", "10.20.0.12", Some("prod-east"), Some("mgr-alpha")),
    ("srv-03", "10.20.1.21", Some("prod-west"), Some("mgr-beta")),
    ("srv-04", "10.20.1.22", None, None),
    ("srv-05", "172.16.4.5", Some("dmz"), None),
    ("srv-06", "172.16.4.6", None, None),
];

#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub alerts: Vec<AlertRecord>,
    pub policies: Vec<FilePolicyRecord>,
    pub servers: Vec<ServerRecord>,
}

impl DemoDataset {
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let alerts = sample_alerts(count, &mut rng);
        let policies = alerts
            .iter()
            .filter_map(|a| {
                Policy::from_exception(a.exception).map(|p| FilePolicyRecord::promote(a.clone(), p))
            })
            .collect();
        Self {
            alerts,
            policies,
            servers: sample_servers(),
        }
    }
}

pub fn sample_servers() -> Vec<ServerRecord> {
    SERVERS
        .iter()
        .enumerate()
        .map(|(i, (host, ip, cluster, manager))| ServerRecord {
            id: format!("server-{}", i + 1),
            server_ip: ip.to_string(),
            hostname: host.to_string(),
            cluster: cluster.map(str::to_string),
            manager: manager.map(str::to_string),
        })
        .collect()
}

/// `count` alerts with ids `req-0001…`, newest first, roughly 70% pending.
pub fn sample_alerts<R: Rng>(count: usize, rng: &mut R) -> Vec<AlertRecord> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let verdict = match rng.gen_range(0..10) {
                0..=3 => Verdict::Malware,
                4..=5 => Verdict::Suspicious,
                6..=8 => Verdict::Benign,
                _ => Verdict::Unknown,
            };
            let risk = match verdict {
                Verdict::Malware => rng.gen_range(75..=100),
                Verdict::Suspicious => rng.gen_range(45..=85),
                Verdict::Benign => rng.gen_range(0..=40),
                Verdict::Unknown => rng.gen_range(20..=70),
            };
            let process_status = match rng.gen_range(0..10) {
                0..=6 => ProcessStatus::Pending,
                7 => ProcessStatus::Quarantine,
                8 => ProcessStatus::Delete,
                _ => ProcessStatus::NoAction,
            };
            let exception = match (process_status, rng.gen_range(0..6)) {
                (ProcessStatus::Pending, _) => ExceptionKind::None,
                (_, 0) => ExceptionKind::Blacklist,
                (_, 1) => ExceptionKind::Whitelist,
                _ => ExceptionKind::None,
            };
            let (_, ip, _, _) = SERVERS[rng.gen_range(0..SERVERS.len())];

            AlertRecord {
                id: format!("req-{:04}", i + 1),
                time: now - Duration::minutes(7 * i as i64 + rng.gen_range(0..7)),
                file_name: FILE_NAMES[rng.gen_range(0..FILE_NAMES.len())].to_string(),
                server_ip: ip.to_string(),
                risk: RiskScore::new(risk),
                verdict,
                process_status,
                exception,
                memo: None,
                processed_by: process_status.is_terminal().then(|| "system".to_string()),
            }
        })
        .collect()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Classification produced by the detection engine for a scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Malware,
    Benign,
    Suspicious,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malware => "Malware",
            Self::Benign => "Benign",
            Self::Suspicious => "Suspicious",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "malware" => Ok(Self::Malware),
            "benign" => Ok(Self::Benign),
            "suspicious" => Ok(Self::Suspicious),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown verdict '{}'", other)),
        }
    }
}

/// Triage disposition of an alert.
///
/// `Pending` is the only state from which the bulk pathway may move a record;
/// the other three are terminal from the console's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    #[default]
    Pending,
    NoAction,
    Quarantine,
    Delete,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NoAction => "no_action",
            Self::Quarantine => "quarantine",
            Self::Delete => "delete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// `pending -> {pending, no_action, quarantine, delete}`; nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: ProcessStatus) -> bool {
        matches!((self, next), (Self::Pending, _))
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProcessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "no_action" => Ok(Self::NoAction),
            "quarantine" => Ok(Self::Quarantine),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown process status '{}'", other)),
        }
    }
}

/// Membership override, independent of the process status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionKind {
    #[default]
    None,
    Blacklist,
    Whitelist,
}

impl ExceptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Blacklist => "blacklist",
            Self::Whitelist => "whitelist",
        }
    }
}

impl std::fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExceptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "blacklist" => Ok(Self::Blacklist),
            "whitelist" => Ok(Self::Whitelist),
            other => Err(format!("unknown exception '{}'", other)),
        }
    }
}

/// Risk score as a percentage, clamped to 0..=100.
///
/// Accepts either a number (`85`, `85.4`) or a labeled percentage (`"85%"`)
/// when deserializing; always serializes as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn bucket(&self) -> RiskBucket {
        match self.0 {
            80..=u8::MAX => RiskBucket::High,
            50..=79 => RiskBucket::Medium,
            _ => RiskBucket::Low,
        }
    }

    fn parse_label(label: &str) -> Result<Self, String> {
        let trimmed = label.trim().trim_end_matches('%').trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| format!("invalid risk value '{}'", label))?;
        Ok(Self::from_f64(value))
    }

    fn from_f64(value: f64) -> Self {
        Self(value.round().clamp(0.0, 100.0) as u8)
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(RiskScore::from_f64(n)),
            Raw::Label(s) => RiskScore::parse_label(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Coarse risk band used by the list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBucket {
    /// 80 and above
    High,
    /// 50 to 79
    Medium,
    /// below 50
    Low,
}

impl RiskBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn contains(&self, risk: RiskScore) -> bool {
        risk.bucket() == *self
    }
}

impl std::str::FromStr for RiskBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown risk bucket '{}'", other)),
        }
    }
}

/// One scanned file/event surfaced to the analysts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub time: DateTime<Utc>,
    pub file_name: String,
    pub server_ip: String,
    pub risk: RiskScore,
    pub verdict: Verdict,
    #[serde(default)]
    pub process_status: ProcessStatus,
    #[serde(default)]
    pub exception: ExceptionKind,
    /// Comment left by the analyst who processed the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<String>,
}

impl AlertRecord {
    pub fn is_pending(&self) -> bool {
        self.process_status == ProcessStatus::Pending
    }
}

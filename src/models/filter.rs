use serde::{Deserialize, Serialize};
use super::alert::{AlertRecord, RiskBucket, Verdict};
use super::page::{PageRequest, DEFAULT_PAGE_SIZE};

/// Column filters of the alert tables. Unset fields match everything;
/// set fields compose with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_ip: Option<String>,
}

impl AlertFilters {
    pub fn is_empty(&self) -> bool {
        self.risk.is_none() && self.verdict.is_none() && self.server_ip.is_none()
    }

    pub fn with_risk(mut self, risk: RiskBucket) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn with_server_ip(mut self, server_ip: impl Into<String>) -> Self {
        self.server_ip = Some(server_ip.into());
        self
    }

    /// Risk bucket first, then verdict, then server IP.
    pub fn matches(&self, record: &AlertRecord) -> bool {
        if let Some(bucket) = self.risk {
            if !bucket.contains(record.risk) {
                return false;
            }
        }
        if let Some(verdict) = self.verdict {
            if record.verdict != verdict {
                return false;
            }
        }
        if let Some(ip) = &self.server_ip {
            if record.server_ip != *ip {
                return false;
            }
        }
        true
    }
}

/// Flat query-string form of a filtered, paginated list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    #[serde(default, rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl AlertQuery {
    pub fn new(filters: &AlertFilters, page: PageRequest) -> Self {
        Self {
            risk: filters.risk,
            verdict: filters.verdict,
            server_ip: filters.server_ip.clone(),
            current: Some(page.current),
            page_size: Some(page.page_size),
        }
    }

    pub fn filters(&self) -> AlertFilters {
        AlertFilters {
            risk: self.risk,
            verdict: self.verdict,
            server_ip: self.server_ip.clone().filter(|ip| !ip.is_empty()),
        }
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::new(
            self.current.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_round_trips_filters_and_page() {
        let filters = AlertFilters::default()
            .with_risk(RiskBucket::High)
            .with_server_ip("10.0.0.1");
        let query = AlertQuery::new(&filters, PageRequest::new(2, 50));
        assert_eq!(query.filters(), filters);
        assert_eq!(query.page(), PageRequest::new(2, 50));
    }

    #[test]
    fn test_blank_server_ip_is_ignored() {
        let query = AlertQuery { server_ip: Some(String::new()), ..Default::default() };
        assert!(query.filters().is_empty());
        assert_eq!(query.page(), PageRequest::default());
    }
}

use serde::{Deserialize, Serialize};

use crate::risk::RiskTier;
use crate::vuln::VulnRecord;

/// One running process, as captured at scan time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    /// Image name (e.g., "svchost.exe").
    pub name: String,
    pub pid: u32,
    pub path: String,
    pub version: String,
    /// Name of a currently-running service that owns this pid, if any.
    pub linked_service: Option<String>,
    #[serde(default)]
    pub vulns: Vec<VulnRecord>,
    #[serde(default)]
    pub risk: RiskTier,
}

impl ProcessEntry {
    pub fn new(
        name: impl Into<String>,
        pid: u32,
        path: impl Into<String>,
        version: impl Into<String>,
        linked_service: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pid,
            path: path.into(),
            version: version.into(),
            linked_service,
            vulns: Vec::new(),
            risk: RiskTier::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_has_defaults() {
        let entry = ProcessEntry::new("sqlservr.exe", 4312, "C:\\x.exe", "15.0", Some("MSSQLSERVER".into()));
        assert!(entry.vulns.is_empty());
        assert_eq!(entry.risk, RiskTier::Low);
        assert_eq!(entry.linked_service.as_deref(), Some("MSSQLSERVER"));
    }

    #[test]
    fn linked_service_round_trips_absent() {
        let entry = ProcessEntry::new("notepad.exe", 100, "C:\\n.exe", "Unknown", None);
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ProcessEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.linked_service, None);
    }
}

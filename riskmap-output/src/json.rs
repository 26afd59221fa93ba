use crate::traits::{OutputError, ReportFormatter};
use riskmap_types::SnapshotReport;

/// Formats the snapshot as pretty-printed JSON.
///
/// Since every type in `SnapshotReport` derives `Serialize`, this is
/// near-trivial.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &SnapshotReport) -> Result<String, OutputError> {
        serde_json::to_string_pretty(report)
            .map_err(|e| OutputError::FormatError(format!("JSON serialization error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskmap_types::{ProcessEntry, RiskTier, ServiceEntry, ServiceState, VulnRecord};
    use std::collections::BTreeMap;

    fn make_report() -> SnapshotReport {
        let mut service = ServiceEntry::new(
            "Spooler",
            "Print Spooler",
            ServiceState::Running,
            r"C:\Windows\System32\spoolsv.exe",
            "10.0.19041.1",
        );
        service.vulns = vec![VulnRecord {
            id: Some("CVE-2021-34527".into()),
            score: Some(9.8),
            summary: "Windows Print Spooler remote code execution.".into(),
        }];
        service.risk = RiskTier::High;

        let process = ProcessEntry::new(
            "notepad.exe",
            812,
            r"C:\Windows\notepad.exe",
            "10.0.19041.1",
            None,
        );

        let mut counts = BTreeMap::new();
        counts.insert("Running".to_string(), 1u64);

        SnapshotReport::new(vec![service], vec![process], counts)
    }

    #[test]
    fn output_is_valid_json() {
        let json = JsonFormatter.format(&make_report()).unwrap();
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();
    }

    #[test]
    fn report_round_trips() {
        let report = make_report();
        let json = JsonFormatter.format(&report).unwrap();
        let parsed: SnapshotReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.services.len(), 1);
        assert_eq!(parsed.services[0].name, "Spooler");
        assert_eq!(parsed.services[0].risk, RiskTier::High);
        assert_eq!(parsed.services[0].vulns[0].score, Some(9.8));
        assert_eq!(parsed.processes[0].pid, 812);
        assert_eq!(parsed.processes[0].linked_service, None);
        assert_eq!(parsed.state_counts["Running"], 1);
    }

    #[test]
    fn contains_expected_fields() {
        let json = JsonFormatter.format(&make_report()).unwrap();
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"state_counts\""));
        assert!(json.contains("\"services\""));
        assert!(json.contains("\"processes\""));
        assert!(json.contains("\"CVE-2021-34527\""));
    }
}

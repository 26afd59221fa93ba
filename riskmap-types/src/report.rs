use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::process::ProcessEntry;
use crate::service::ServiceEntry;

/// Everything one snapshot run produces: the (possibly enriched)
/// inventories plus the informational per-state service totals, stamped
/// with the run time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotReport {
    /// Filesystem-safe UTC run timestamp (`YYYY-MM-DD_HH-MM-SS`), also used
    /// as the report directory name.
    pub timestamp: String,
    /// Service counts keyed by state display name, passed through unchanged
    /// from the service scan.
    pub state_counts: BTreeMap<String, u64>,
    pub services: Vec<ServiceEntry>,
    pub processes: Vec<ProcessEntry>,
}

impl SnapshotReport {
    pub fn new(
        services: Vec<ServiceEntry>,
        processes: Vec<ProcessEntry>,
        state_counts: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            timestamp: timestamp_now(),
            state_counts,
            services,
            processes,
        }
    }
}

/// Current UTC time as a filesystem-safe timestamp.
pub fn timestamp_now() -> String {
    format_timestamp(SystemTime::now())
}

/// Format a time as `YYYY-MM-DD_HH-MM-SS` (UTC) without pulling in chrono.
pub fn format_timestamp(t: SystemTime) -> String {
    let secs = t
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, mo, da) = days_to_ymd(secs / 86400);
    let time_secs = secs % 86400;
    let h = time_secs / 3600;
    let m = (time_secs % 3600) / 60;
    let s = time_secs % 60;
    format!("{y:04}-{mo:02}-{da:02}_{h:02}-{m:02}-{s:02}")
}

fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    // Adapted from Howard Hinnant's algorithm
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

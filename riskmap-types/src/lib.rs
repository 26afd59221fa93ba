pub mod process;
pub mod report;
pub mod risk;
pub mod service;
pub mod vuln;

pub use process::ProcessEntry;
pub use report::{SnapshotReport, format_timestamp, timestamp_now};
pub use risk::RiskTier;
pub use service::{ServiceEntry, ServiceState};
pub use vuln::VulnRecord;

/// Sentinel used when an executable path could not be resolved.
pub const PATH_UNAVAILABLE: &str = "Not available";

/// Sentinel used when a product version could not be resolved.
pub const VERSION_UNKNOWN: &str = "Unknown";

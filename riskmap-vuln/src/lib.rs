pub mod classify;
pub mod client;
pub mod enrich;
pub mod throttle;

pub use classify::{HIGH_RISK_CUTOFF, classify, safe_score};
pub use client::{CVE_RESULT_LIMIT, CpeMatch, NvdClient, VulnSource};
pub use enrich::{Enrich, enrich_entries};
pub use throttle::RateGate;

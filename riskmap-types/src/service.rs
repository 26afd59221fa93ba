use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::RiskTier;
use crate::vuln::VulnRecord;

/// Run state of a Win32 service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Running,
    Stopped,
    StartPending,
    StopPending,
    Paused,
    PausePending,
    ContinuePending,
    #[default]
    Unknown,
}

impl ServiceState {
    /// Map a raw `SERVICE_STATUS` current-state code (winsvc.h values).
    pub fn from_win32(code: u32) -> Self {
        match code {
            1 => Self::Stopped,
            2 => Self::StartPending,
            3 => Self::StopPending,
            4 => Self::Running,
            5 => Self::ContinuePending,
            6 => Self::PausePending,
            7 => Self::Paused,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
            Self::StartPending => write!(f, "Start Pending"),
            Self::StopPending => write!(f, "Stop Pending"),
            Self::Paused => write!(f, "Paused"),
            Self::PausePending => write!(f, "Pause Pending"),
            Self::ContinuePending => write!(f, "Continue Pending"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One installed service, as captured at scan time.
///
/// `vulns` and `risk` start at their defaults and are filled in by the
/// enrichment pipeline; a capped or skipped run leaves them untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub display_name: String,
    pub state: ServiceState,
    pub path: String,
    pub version: String,
    #[serde(default)]
    pub vulns: Vec<VulnRecord>,
    #[serde(default)]
    pub risk: RiskTier,
}

impl ServiceEntry {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        state: ServiceState,
        path: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            state,
            path: path.into(),
            version: version.into(),
            vulns: Vec::new(),
            risk: RiskTier::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_win32_codes() {
        assert_eq!(ServiceState::from_win32(1), ServiceState::Stopped);
        assert_eq!(ServiceState::from_win32(2), ServiceState::StartPending);
        assert_eq!(ServiceState::from_win32(3), ServiceState::StopPending);
        assert_eq!(ServiceState::from_win32(4), ServiceState::Running);
        assert_eq!(ServiceState::from_win32(5), ServiceState::ContinuePending);
        assert_eq!(ServiceState::from_win32(6), ServiceState::PausePending);
        assert_eq!(ServiceState::from_win32(7), ServiceState::Paused);
        assert_eq!(ServiceState::from_win32(0), ServiceState::Unknown);
        assert_eq!(ServiceState::from_win32(99), ServiceState::Unknown);
    }

    #[test]
    fn new_entry_has_defaults() {
        let entry = ServiceEntry::new("Spooler", "Print Spooler", ServiceState::Running, "C:\\x.exe", "1.0");
        assert!(entry.vulns.is_empty());
        assert_eq!(entry.risk, RiskTier::Low);
    }

    #[test]
    fn state_display() {
        assert_eq!(ServiceState::Running.to_string(), "Running");
        assert_eq!(ServiceState::StartPending.to_string(), "Start Pending");
    }
}

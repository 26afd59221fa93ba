use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse risk tier derived from the worst vulnerability severity found
/// for an inventory entry.
///
/// Entries that were never enriched keep the `Low` default; there is no
/// separate "unknown" variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

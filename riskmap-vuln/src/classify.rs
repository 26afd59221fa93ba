use riskmap_types::{RiskTier, VulnRecord};

/// CVSS base score at or above which a single vulnerability makes an
/// entry High risk.
pub const HIGH_RISK_CUTOFF: f64 = 7.0;

/// Coerce an optional severity score into a number usable for tier
/// decisions.
///
/// Absent and non-finite scores count as 0.0. This is the only place a
/// missing score becomes a concrete number, and that number is used for
/// classification only; the record keeps its original (possibly absent)
/// score for display.
pub fn safe_score(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_finite() => s,
        _ => 0.0,
    }
}

/// Derive the risk tier for one inventory entry from its vulnerabilities.
///
/// Any score at or above [`HIGH_RISK_CUTOFF`] is High; any vulnerability at
/// all is Medium; an empty list is Low.
pub fn classify(vulns: &[VulnRecord]) -> RiskTier {
    if vulns.iter().any(|v| safe_score(v.score) >= HIGH_RISK_CUTOFF) {
        RiskTier::High
    } else if !vulns.is_empty() {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

use serde::{Deserialize, Serialize};

/// A single vulnerability reported for an inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnRecord {
    /// External identifier (e.g., "CVE-2024-1234"). `None` when the upstream
    /// entry carries no identifier; never synthesized.
    pub id: Option<String>,
    /// CVSS v3.1 base score in [0.0, 10.0]. `None` means the score was not
    /// available upstream.
    pub score: Option<f64>,
    /// Free-text description. Truncation for display is a rendering concern;
    /// the record keeps the full text.
    pub summary: String,
}

impl VulnRecord {
    /// Identifier for reports; absent identifiers display as "N/A".
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("N/A")
    }

    /// Score for reports; absent scores display as "N/A".
    pub fn display_score(&self) -> String {
        match self.score {
            Some(score) => format!("{score:.1}"),
            None => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_score_present() {
        let record = VulnRecord {
            id: Some("CVE-2024-0001".into()),
            score: Some(9.8),
            summary: "test".into(),
        };
        assert_eq!(record.display_score(), "9.8");
    }

    #[test]
    fn display_score_absent() {
        let record = VulnRecord {
            id: None,
            score: None,
            summary: "test".into(),
        };
        assert_eq!(record.display_score(), "N/A");
        assert_eq!(record.display_id(), "N/A");
    }

    #[test]
    fn absent_id_survives_serde() {
        let record = VulnRecord {
            id: None,
            score: None,
            summary: "No description".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: VulnRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.score, None);
        assert_eq!(parsed.summary, "No description");
    }
}

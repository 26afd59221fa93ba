use riskmap_types::SnapshotReport;

/// Trait for rendering a snapshot report into one output artifact.
pub trait ReportFormatter: Send + Sync {
    fn format(&self, report: &SnapshotReport) -> Result<String, OutputError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("formatting error: {0}")]
    FormatError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use riskmap_types::SnapshotReport;

use crate::html::HtmlFormatter;
use crate::json::JsonFormatter;
use crate::text::TextFormatter;
use crate::traits::{OutputError, ReportFormatter};

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    for component in path.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(OutputError::FormatError(format!(
                "output path '{}' must not contain '..' components",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Persists a snapshot as a timestamped report directory holding one file
/// per format.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `report.txt`, `report.json`, and `report.html` under
    /// `<output_dir>/<timestamp>/`. Returns the report directory.
    pub fn write(&self, report: &SnapshotReport) -> Result<PathBuf, OutputError> {
        validate_output_path(&self.output_dir)?;

        let dir = self.output_dir.join(&report.timestamp);
        fs::create_dir_all(&dir)?;

        let formatters: [(&str, &dyn ReportFormatter); 3] = [
            ("report.txt", &TextFormatter),
            ("report.json", &JsonFormatter),
            ("report.html", &HtmlFormatter),
        ];

        for (file_name, formatter) in formatters {
            let body = formatter.format(report)?;
            let path = dir.join(file_name);
            fs::write(&path, &body).map_err(|e| {
                OutputError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to write {}: {}", path.display(), e),
                ))
            })?;
        }

        info!(dir = %dir.display(), "reports written");
        Ok(dir)
    }
}

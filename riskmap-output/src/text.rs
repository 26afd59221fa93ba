use std::fmt::Write;

use riskmap_types::{SnapshotReport, VulnRecord};

use crate::traits::{OutputError, ReportFormatter};

/// How much of a vulnerability summary the tables show.
const SUMMARY_DISPLAY_LEN: usize = 60;

/// Fixed-width plain-text tables: one for services, one for processes,
/// each with per-entry CVE sublines, plus a service-state footer.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &SnapshotReport) -> Result<String, OutputError> {
        let mut out = String::with_capacity(16_384);
        write_report(&mut out, report).map_err(|e| OutputError::FormatError(e.to_string()))?;
        Ok(out)
    }
}

/// Strip terminal control characters from untrusted data to prevent escape
/// injection.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                '?'
            } else {
                c
            }
        })
        .collect()
}

/// Truncate a summary to its display length on a character boundary.
fn truncate_summary(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.chars().count() <= SUMMARY_DISPLAY_LEN {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SUMMARY_DISPLAY_LEN).collect();
        format!("{cut}...")
    }
}

fn write_vuln_line(out: &mut String, indent: usize, vuln: &VulnRecord) -> std::fmt::Result {
    writeln!(
        out,
        "{:indent$}-> {} | CVSS: {} | {}",
        "",
        vuln.display_id(),
        vuln.display_score(),
        sanitize(&truncate_summary(&vuln.summary)),
    )
}

fn write_report(out: &mut String, report: &SnapshotReport) -> std::fmt::Result {
    writeln!(out, "=== WINDOWS SERVICES ({}) ===", report.timestamp)?;
    writeln!(
        out,
        "{:<25} {:<17} {:<20} {:<8} PATH",
        "NAME", "STATE", "VERSION", "RISK"
    )?;
    writeln!(out, "{}", "-".repeat(120))?;
    for service in &report.services {
        writeln!(
            out,
            "{:<25} {:<17} {:<20} {:<8} {}",
            sanitize(&service.name),
            service.state.to_string(),
            sanitize(&service.version),
            service.risk.to_string(),
            sanitize(&service.path),
        )?;
        for vuln in &service.vulns {
            write_vuln_line(out, 4, vuln)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "=== SERVICE STATE COUNTS ===")?;
    for (state, count) in &report.state_counts {
        writeln!(out, "{state:<17}: {count}")?;
    }

    writeln!(out)?;
    writeln!(out, "=== RUNNING PROCESSES ===")?;
    writeln!(
        out,
        "{:<25} {:<7} {:<20} {:<8} {:<20} PATH",
        "NAME", "PID", "VERSION", "RISK", "LINKED SERVICE"
    )?;
    writeln!(out, "{}", "-".repeat(140))?;
    for process in &report.processes {
        writeln!(
            out,
            "{:<25} {:<7} {:<20} {:<8} {:<20} {}",
            sanitize(&process.name),
            process.pid,
            sanitize(&process.version),
            process.risk.to_string(),
            sanitize(process.linked_service.as_deref().unwrap_or("None")),
            sanitize(&process.path),
        )?;
        for vuln in &process.vulns {
            write_vuln_line(out, 4, vuln)?;
        }
    }

    Ok(())
}

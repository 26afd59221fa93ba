use std::fmt::Write;

use riskmap_types::{RiskTier, SnapshotReport, VulnRecord};

use crate::traits::{OutputError, ReportFormatter};

/// Self-contained HTML report with inline CSS and risk-tinted rows.
pub struct HtmlFormatter;

impl ReportFormatter for HtmlFormatter {
    fn format(&self, report: &SnapshotReport) -> Result<String, OutputError> {
        let mut out = String::with_capacity(32_768);
        write_html_report(&mut out, report)
            .map_err(|e| OutputError::FormatError(e.to_string()))?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn risk_class(risk: RiskTier) -> &'static str {
    match risk {
        RiskTier::High => "risk-high",
        RiskTier::Medium => "risk-medium",
        RiskTier::Low => "risk-low",
    }
}

fn write_vuln_row(out: &mut String, colspan: usize, vuln: &VulnRecord) -> std::fmt::Result {
    writeln!(
        out,
        "<tr class=\"vuln\"><td colspan=\"{}\">&rarr; <b>{}</b> | CVSS: {} | {}</td></tr>",
        colspan,
        html_escape(vuln.display_id()),
        html_escape(&vuln.display_score()),
        html_escape(&vuln.summary),
    )
}

// ---------------------------------------------------------------------------
// report builder
// ---------------------------------------------------------------------------

fn write_html_report(out: &mut String, report: &SnapshotReport) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>riskmap report {}</title>", html_escape(&report.timestamp))?;
    writeln!(out, "<style>")?;
    writeln!(out, "body {{ font-family: sans-serif; margin: 2em; }}")?;
    writeln!(out, "h1, h2 {{ color: #333; }}")?;
    writeln!(out, "table {{ border-collapse: collapse; width: 100%; margin-bottom: 2.5em; }}")?;
    writeln!(out, "th, td {{ border: 1px solid #ccc; padding: 6px 8px; text-align: left; }}")?;
    writeln!(out, "th {{ background-color: #f2f2f2; }}")?;
    writeln!(out, ".risk-high {{ background-color: #ffd6d6; }}")?;
    writeln!(out, ".risk-medium {{ background-color: #ffe8c6; }}")?;
    writeln!(out, ".risk-low {{ background-color: #e4f5e4; }}")?;
    writeln!(out, ".vuln td {{ color: #555; font-size: 0.9em; }}")?;
    writeln!(out, "</style></head><body>")?;

    writeln!(out, "<h1>riskmap &mdash; host risk snapshot</h1>")?;
    writeln!(out, "<p>Taken {}</p>", html_escape(&report.timestamp))?;

    writeln!(out, "<h2>Services</h2>")?;
    writeln!(out, "<table>")?;
    writeln!(
        out,
        "<tr><th>Name</th><th>State</th><th>Version</th><th>Risk</th><th>Path</th></tr>"
    )?;
    for service in &report.services {
        writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            risk_class(service.risk),
            html_escape(&service.name),
            service.state,
            html_escape(&service.version),
            service.risk,
            html_escape(&service.path),
        )?;
        for vuln in &service.vulns {
            write_vuln_row(out, 5, vuln)?;
        }
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<h2>Processes</h2>")?;
    writeln!(out, "<table>")?;
    writeln!(
        out,
        "<tr><th>Name</th><th>PID</th><th>Version</th><th>Risk</th><th>Linked service</th><th>Path</th></tr>"
    )?;
    for process in &report.processes {
        writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            risk_class(process.risk),
            html_escape(&process.name),
            process.pid,
            html_escape(&process.version),
            process.risk,
            html_escape(process.linked_service.as_deref().unwrap_or("None")),
            html_escape(&process.path),
        )?;
        for vuln in &process.vulns {
            write_vuln_row(out, 6, vuln)?;
        }
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<h2>Service state counts</h2>")?;
    writeln!(out, "<ul>")?;
    for (state, count) in &report.state_counts {
        writeln!(out, "<li><b>{}</b>: {}</li>", html_escape(state), count)?;
    }
    writeln!(out, "</ul>")?;

    writeln!(out, "</body></html>")?;
    Ok(())
}

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Args;
use riskmap_inventory::{ServiceScan, scan_processes, scan_services};
use riskmap_output::ReportWriter;
use riskmap_types::SnapshotReport;
use riskmap_vuln::{NvdClient, enrich_entries};

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; a missing one is not an error.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing based on verbosity
    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if !args.cve && args.stop.is_some() {
        warn!("--stop has no effect unless used with --cve");
    }

    info!("scanning services");
    let ServiceScan {
        mut services,
        state_counts,
        pid_map,
    } = scan_services().context("service inventory failed")?;
    info!(count = services.len(), "services collected");

    info!("scanning processes");
    let mut processes = scan_processes(&pid_map);
    info!(count = processes.len(), "processes collected");

    if args.cve {
        let api_key = args
            .api_key
            .clone()
            .or_else(|| std::env::var("NVD_API_KEY").ok())
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            warn!("no NVD API key configured; vulnerability lookups will return no data");
        }
        let client = NvdClient::new(api_key).context("failed to build NVD client")?;

        info!(count = services.len(), "scanning CVEs for services");
        enrich_entries(&client, &mut services, args.stop).await;

        info!(count = processes.len(), "scanning CVEs for processes");
        enrich_entries(&client, &mut processes, args.stop).await;
    } else {
        info!("CVE enrichment disabled (pass --cve to enable)");
    }

    let report = SnapshotReport::new(services, processes, state_counts);
    let dir = ReportWriter::new(&args.output_dir)
        .write(&report)
        .context("failed to write reports")?;
    info!(dir = %dir.display(), "snapshot complete");

    Ok(())
}

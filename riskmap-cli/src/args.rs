use std::path::PathBuf;

use clap::Parser;

/// riskmap - service and process risk snapshot for a single host
#[derive(Parser, Debug)]
#[command(
    name = "riskmap",
    version,
    about = "Windows service/process inventory with NVD risk scoring"
)]
pub struct Args {
    /// Enable CVE enrichment for services and processes
    #[arg(long = "cve")]
    pub cve: bool,

    /// Stop CVE enrichment after N services and N processes
    #[arg(long = "stop", value_name = "N")]
    pub stop: Option<usize>,

    /// Directory that receives timestamped report folders
    #[arg(long = "output-dir", value_name = "DIR", default_value = "logs")]
    pub output_dir: PathBuf,

    /// NVD API key (overrides the NVD_API_KEY environment variable)
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Increase verbosity level (use -v or -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

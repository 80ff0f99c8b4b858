//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "rankwatch")]
#[command(
    about = "Watch ranked lists and announce additions, removals and genuine moves",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Discord webhook URL (prefer RANKWATCH_WEBHOOK; flags show up in `ps`)
    #[arg(long, value_name = "URL")]
    pub webhook: Option<String>,

    /// Base URL of the list data
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// List types to process, in order
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub list_types: Option<Vec<String>>,

    /// Directory holding one stored snapshot per list type
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum concurrent metadata requests
    #[arg(long, value_name = "N")]
    pub metadata_concurrency: Option<usize>,

    /// reuse-known or always-fetch
    #[arg(long, value_name = "POLICY")]
    pub metadata_policy: Option<String>,

    /// pretty or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Print notifications instead of sending them; never writes state
    #[arg(long)]
    pub dry_run: bool,
}

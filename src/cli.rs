use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "advisory-watch",
    about = "Track weather advisories for watched areas and notify on change",
    version
)]
pub struct Cli {
    /// Config file [default: ./.advisory-watch/config.toml, fallback ~/.config/advisory-watch/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persisted-state file (overrides `state.path` from config)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Read table rows from a JSON file instead of fetching the page
    #[arg(long, value_name = "FILE")]
    pub rows: Option<PathBuf>,

    /// Print the notification instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Do not write the new state
    #[arg(long)]
    pub no_save: bool,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

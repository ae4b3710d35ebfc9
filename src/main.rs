//! `advisory-watch` — scrape the weather advisory table, diff it against the
//! last run, and notify when advisories for watched areas change.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]).
//! 3. Obtain raw table rows from the page or a rows file ([`source`]).
//! 4. Normalize, classify, notify and persist ([`cycle::run_cycle`]).
//! 5. Render the run report ([`report`]).
//!
//! Exit `0` when the cycle completed, including when delivery failed.
//! Fetch, config and persistence failures exit non-zero without touching state.

mod cli;
mod config;
mod cycle;
mod models;
mod notify;
mod report;
mod source;
mod store;
mod tracker;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::{load_config, Config};
use cycle::{run_from_source, CycleOptions};
use notify::console::ConsoleNotifier;
use notify::telegram::TelegramNotifier;
use notify::Channel;
use source::Row;
use store::FileStateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let watch = config.watch_list();
    let state_path = config.state_path(cli.state.as_deref());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.source.timeout_secs))
        .build()?;

    let channel = select_channel(&cli, &config, client.clone());
    let store = FileStateStore::new(&state_path);
    let options = CycleOptions {
        heartbeat: config.notify.heartbeat,
        save: !cli.no_save,
    };

    let rows = async {
        match &cli.rows {
            Some(path) => source::rows_file::load_rows(path),
            None => fetch_with_spinner(&client, &config, cli.quiet).await,
        }
    };
    let outcome = run_from_source(rows, &watch, &store, &channel, options).await?;
    tracing::info!(
        changed = !outcome.classification.is_noop(),
        saved = outcome.saved,
        "cycle complete"
    );

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&outcome, &watch, store.path(), cli.quiet);
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn fetch_with_spinner(
    client: &reqwest::Client,
    config: &Config,
    quiet: bool,
) -> Result<Vec<Row>> {
    let pb = if !quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Fetching {}", config.source.url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = source::page::fetch_rows(client, &config.source.url).await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    result
}

fn select_channel(cli: &Cli, config: &Config, client: reqwest::Client) -> Channel {
    if cli.dry_run {
        return Channel::Console(ConsoleNotifier);
    }
    match &config.telegram {
        Some(tg) => Channel::Telegram(TelegramNotifier::new(client, tg.clone())),
        None => {
            tracing::warn!("no [telegram] config; printing notifications to stderr");
            Channel::Console(ConsoleNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_telegram_falls_back_to_console() {
        let cli = Cli::parse_from(["advisory-watch"]);
        let channel = select_channel(&cli, &Config::default(), reqwest::Client::new());
        assert!(matches!(channel, Channel::Console(_)));
    }

    #[test]
    fn test_dry_run_uses_console() {
        let cli = Cli::parse_from(["advisory-watch", "--dry-run"]);
        let config: Config =
            toml::from_str("[telegram]\nbot_token = \"t\"\nchat_id = \"1\"").unwrap();
        let channel = select_channel(&cli, &config, reqwest::Client::new());
        assert!(matches!(channel, Channel::Console(_)));
    }
}

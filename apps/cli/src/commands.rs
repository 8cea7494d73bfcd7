//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use shiftscope_core::pipeline::{ProgressReporter, RunAbort, RunOutcome, RunRequest, RunStage};
use shiftscope_fetcher::SearchClient;
use shiftscope_shared::{
    AppConfig, AreaKey, FetchConfig, RunStatus, api_token, init_config, load_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Shiftscope — support-conversation reporting.
#[derive(Parser)]
#[command(
    name = "shiftscope",
    version,
    about = "Fetch closed support conversations and render per-team, per-area reports.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run a reporting sweep and write artifacts to disk.
    Run {
        /// Restrict to one team (e.g. "Tier 1", "Card").
        #[arg(long)]
        team: Option<String>,

        /// Restrict to one product area (e.g. "Swaps", "Wallet API").
        #[arg(long)]
        area: Option<String>,

        /// Window start day (YYYY-MM-DD, requires --end). Defaults to the
        /// last full Monday-through-Sunday week.
        #[arg(long)]
        start: Option<String>,

        /// Window end day (YYYY-MM-DD, requires --start).
        #[arg(long)]
        end: Option<String>,

        /// Output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Fetch a single conversation by id and render its reports.
    FetchOne {
        /// Conversation id.
        id: String,

        /// Output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "shiftscope=info",
        1 => "shiftscope=debug",
        _ => "shiftscope=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            team,
            area,
            start,
            end,
            output,
        } => cmd_run(team, area, start, end, output).await,
        Command::FetchOne { id, output } => cmd_fetch_one(&id, output).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    team: Option<String>,
    area: Option<String>,
    start: Option<String>,
    end: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let token = api_token(&config)?;

    let request = RunRequest {
        conversation_id: None,
        start: start.as_deref().map(parse_day).transpose()?,
        end: end.as_deref().map(parse_day).transpose()?,
        team,
        area: area.as_deref().map(parse_area).transpose()?,
        delivery: None,
    };

    execute(&config, &token, request, output.as_deref()).await
}

async fn cmd_fetch_one(id: &str, output: Option<String>) -> Result<()> {
    let config = load_config()?;
    let token = api_token(&config)?;

    let request = RunRequest {
        conversation_id: Some(id.to_string()),
        ..Default::default()
    };

    execute(&config, &token, request, output.as_deref()).await
}

async fn execute(
    config: &AppConfig,
    token: &str,
    request: RunRequest,
    output: Option<&str>,
) -> Result<()> {
    let client = SearchClient::new(&FetchConfig::from(config), token)?;
    let out_dir = resolve_output_dir(output.unwrap_or(&config.defaults.output_dir));

    let reporter = CliProgress::new();
    let outcome =
        shiftscope_core::pipeline::run(config, &request, &client, &reporter, &RunAbort::new())
            .await?;

    match outcome.status {
        RunStatus::Success => {
            std::fs::create_dir_all(&out_dir)
                .map_err(|e| eyre!("cannot create {}: {e}", out_dir.display()))?;
            for artifact in &outcome.artifacts {
                let path = out_dir.join(&artifact.name);
                std::fs::write(&path, &artifact.bytes)
                    .map_err(|e| eyre!("cannot write {}: {e}", path.display()))?;
            }

            println!();
            println!("  Run complete.");
            println!("  Conversations: {}", outcome.conversation_count);
            println!("  Files:         {}", outcome.artifacts.len());
            println!("  Output:        {}", out_dir.display());
            println!("  Time:          {:.1}s", outcome.elapsed.as_secs_f64());
            println!();
            Ok(())
        }
        RunStatus::NoData => {
            println!("No conversations in the requested window; nothing written.");
            Ok(())
        }
        RunStatus::NoFilesForTarget => {
            println!(
                "Conversations exist, but none match the requested team/area; nothing written."
            );
            Ok(())
        }
        RunStatus::Failed => {
            let detail = outcome.error.unwrap_or_else(|| "unknown error".into());
            Err(eyre!("run failed: {detail}"))
        }
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Argument parsing helpers
// ---------------------------------------------------------------------------

fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| eyre!("invalid date '{value}' (expected YYYY-MM-DD): {e}"))
}

fn parse_area(value: &str) -> Result<AreaKey> {
    value
        .parse()
        .map_err(|_| eyre!("unknown area '{value}'"))
}

/// Expand a leading `~/` against the user's home directory.
fn resolve_output_dir(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    Path::new(raw).to_path_buf()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: RunStage) {
        self.spinner.set_message(stage.to_string());
    }

    fn bucket_rendered(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {name}"));
    }

    fn done(&self, outcome: &RunOutcome) {
        self.spinner.finish_and_clear();
        info!(status = %outcome.status, "run finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_parsing() {
        assert_eq!(
            parse_day("2025-03-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert!(parse_day("03/03/2025").is_err());
    }

    #[test]
    fn area_parsing_accepts_labels_and_slugs() {
        assert_eq!(parse_area("Wallet API").unwrap(), AreaKey::WalletApi);
        assert_eq!(parse_area("wallet_api").unwrap(), AreaKey::WalletApi);
        assert!(parse_area("gift cards").is_err());
    }

    #[test]
    fn home_expansion() {
        let plain = resolve_output_dir("/tmp/reports");
        assert_eq!(plain, PathBuf::from("/tmp/reports"));
        if dirs::home_dir().is_some() {
            let expanded = resolve_output_dir("~/reports");
            assert!(!expanded.to_string_lossy().starts_with('~'));
        }
    }
}

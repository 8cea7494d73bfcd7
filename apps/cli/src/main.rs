//! Shiftscope CLI — support-conversation reporting tool.
//!
//! Fetches closed support conversations for a reporting window, classifies
//! them by team and product area, and writes CSV exports, insight documents,
//! and end-of-shift roll-ups to disk.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}

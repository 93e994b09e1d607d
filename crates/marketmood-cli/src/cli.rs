//! CLI argument definitions for marketmood.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `report` | Fetch indicators, score sentiment, print the report |
//! | `init-config` | Write a template mail config file |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | `~/.config/marketmood/config.json` | Mail config file location |
//! | `--timeout-ms` | `10000` | Upstream request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Print today's sentiment report
//! marketmood report
//!
//! # Print it and email it to the configured recipients
//! marketmood report --email
//!
//! # Write a credentials template to the default location
//! marketmood init-config
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Indian market sentiment report CLI.
///
/// Combines the Market Mood Index, Nifty 50 / India VIX price action, and
/// FII/DII institutional flows into a qualitative market perspective.
#[derive(Debug, Parser)]
#[command(
    name = "marketmood",
    author,
    version,
    about = "Indian market sentiment report CLI",
    long_about = "Marketmood fetches three independent market indicators — the Tickertape \
Market Mood Index, Nifty 50 / India VIX price action, and FII/DII institutional \
flows — scores them through a fixed heuristic, and prints a sentiment report. \
With --email the report is also delivered over SMTP.\n\
\n\
Use 'marketmood <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Mail config file location.
    ///
    /// Defaults to ~/.config/marketmood/config.json. Environment variables
    /// SENDER_EMAIL, APP_PASSWORD, and RECEIVER_EMAILS override file values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout budget in milliseconds for upstream calls.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch indicators, compute the sentiment perspective, and print the report.
    Report(ReportArgs),
    /// Write a template config file with placeholder credentials.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Also deliver the report by email using the configured credentials.
    #[arg(long, default_value_t = false)]
    pub email: bool,
}

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Where to write the template. Defaults to the standard config path.
    #[arg(long)]
    pub path: Option<PathBuf>,
}

//! CLI argument definitions for coinwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `markets` | Load the top coins by market cap and render them |
//! | `session` | Drive the sign-in / sign-up / sign-out flow and show each transition |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Use bundled fixtures instead of the network |
//! | `--base-url` | CoinGecko v3 | Markets API root |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--log-level` | `warn` | Log filter written to stderr |
//!
//! # Examples
//!
//! ```bash
//! # Show the market listing
//! coinwatch markets --limit 10
//!
//! # Same data as JSON, offline
//! coinwatch --mock --format json --pretty markets
//!
//! # Create an account and sign out again
//! coinwatch session --sign-up --email hal@example.com --password running --confirm running --sign-out
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// coinwatch - cryptocurrency market viewer
#[derive(Debug, Parser)]
#[command(
    name = "coinwatch",
    author,
    version,
    about = "Cryptocurrency market viewer",
    long_about = "coinwatch lists the top cryptocurrencies by market cap and walks through \
the account session flow that gates the listing.\n\
\n\
Use 'coinwatch <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve bundled fixture data and seed a demo account instead of going online.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Root of the CoinGecko-compatible API.
    #[arg(long, global = true, default_value = "https://api.coingecko.com/api/v3")]
    pub base_url: String,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Log filter (e.g. `info`, `coinwatch_core=debug`). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and render the market listing.
    Markets(MarketsArgs),
    /// Run the authentication flow against a local identity service.
    Session(SessionArgs),
}

#[derive(Debug, Args)]
pub struct MarketsArgs {
    /// Render only the first N entries.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Password confirmation, checked when signing up.
    #[arg(long)]
    pub confirm: Option<String>,

    /// Create the account instead of signing in.
    #[arg(long, default_value_t = false)]
    pub sign_up: bool,

    /// Sign out again once authenticated.
    #[arg(long, default_value_t = false)]
    pub sign_out: bool,
}

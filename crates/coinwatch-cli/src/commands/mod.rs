mod markets;
mod session;

use std::sync::Arc;

use coinwatch_core::{CoinGeckoConfig, CoinGeckoSource, FixtureHttpClient, HttpClient, ReqwestHttpClient};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Bundled `/coins/markets` response served by `--mock`.
pub const MARKETS_FIXTURE: &str = include_str!("../../fixtures/markets.json");

/// Output of one command: JSON payload, table rendering and user-facing errors.
pub struct CommandResult {
    pub data: Value,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

impl CommandResult {
    pub fn new(data: Value, header: Vec<&'static str>) -> Self {
        Self {
            data,
            header,
            rows: Vec::new(),
            notes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Markets(args) => markets::run(args, market_source(cli)).await,
        Command::Session(args) => session::run(args, cli.mock).await,
    }
}

fn market_source(cli: &Cli) -> CoinGeckoSource {
    let config = CoinGeckoConfig::default()
        .with_base_url(cli.base_url.clone())
        .with_timeout_ms(cli.timeout_ms);

    let http_client: Arc<dyn HttpClient> = if cli.mock {
        Arc::new(FixtureHttpClient::ok_json(MARKETS_FIXTURE))
    } else {
        Arc::new(ReqwestHttpClient::new(&config.user_agent))
    };

    CoinGeckoSource::new(config, http_client)
}

use std::sync::Arc;

use coinwatch_core::{CoinGeckoSource, EntryView, MarketDataStore, PriceDirection, UtcDateTime};
use serde::Serialize;
use tracing::info;

use crate::cli::MarketsArgs;
use crate::error::CliError;

use super::CommandResult;

const HEADER: [&str; 6] = ["#", "NAME", "SYMBOL", "PRICE", "24H", "MARKET CAP"];

#[derive(Debug, Serialize)]
struct MarketsResponseData {
    entries: Vec<EntryView>,
    error: Option<String>,
    last_updated: Option<UtcDateTime>,
}

pub async fn run(args: &MarketsArgs, source: CoinGeckoSource) -> Result<CommandResult, CliError> {
    let store = MarketDataStore::new(Arc::new(source));
    let snapshot = store.settled().await;
    info!(
        entries = snapshot.entries.len(),
        failed = snapshot.has_error(),
        "market listing settled"
    );

    let limit = args.limit.unwrap_or(snapshot.entries.len());
    let entries: Vec<EntryView> = snapshot
        .entries
        .iter()
        .take(limit)
        .map(EntryView::from_entry)
        .collect();

    let rows = entries
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let arrow = match view.direction {
                PriceDirection::Up => "▲",
                PriceDirection::Down => "▼",
            };
            vec![
                (index + 1).to_string(),
                view.name.clone(),
                view.symbol.clone(),
                view.price.clone(),
                format!("{arrow} {}", view.change_24h),
                view.market_cap.clone(),
            ]
        })
        .collect();

    let data = serde_json::to_value(MarketsResponseData {
        entries,
        error: snapshot.error.clone(),
        last_updated: snapshot.last_updated,
    })?;

    let mut result = CommandResult::new(data, HEADER.to_vec()).with_rows(rows);
    if let Some(updated) = snapshot.last_updated {
        result = result.with_note(format!("updated {updated}"));
    }
    if let Some(error) = snapshot.error {
        result = result.with_error(error);
    }
    Ok(result)
}

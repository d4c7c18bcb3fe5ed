//! Text formatting for market rows.
//!
//! Presentation code renders entries through these helpers so the list view
//! and the detail view agree on precision and sign conventions.

use serde::Serialize;

use crate::MarketEntry;

/// Direction of the 24h price move. Zero counts as `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    Up,
    Down,
}

impl PriceDirection {
    pub fn of(change_percent: f64) -> Self {
        if change_percent >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Pre-formatted strings for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change_24h: String,
    pub direction: PriceDirection,
    pub market_cap: String,
    pub image_url: String,
}

impl EntryView {
    pub fn from_entry(entry: &MarketEntry) -> Self {
        Self {
            id: entry.id().to_owned(),
            name: entry.name().to_owned(),
            symbol: display_symbol(entry.symbol()),
            price: format_price(entry.current_price()),
            change_24h: format_change(entry.price_change_percent_24h()),
            direction: PriceDirection::of(entry.price_change_percent_24h()),
            market_cap: format_market_cap(entry.market_cap()),
            image_url: entry.image_url().to_owned(),
        }
    }
}

pub fn display_symbol(symbol: &str) -> String {
    symbol.to_uppercase()
}

/// List-view price, two decimals.
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Detail-view price, four decimals.
pub fn format_detail_price(price: f64) -> String {
    format!("${price:.4}")
}

pub fn format_change(change_percent: f64) -> String {
    format!("{change_percent:.2}%")
}

/// Whole dollars with thousands separators.
pub fn format_market_cap(market_cap: f64) -> String {
    let rounded = format!("{:.0}", market_cap.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (index, digit) in rounded.chars().enumerate() {
        if index > 0 && (rounded.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if market_cap < 0.0 && rounded != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

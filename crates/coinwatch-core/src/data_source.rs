//! Market-data source trait and its request parameters.
//!
//! Stores depend on [`MarketDataSource`] rather than on a concrete HTTP
//! adapter, so each store gets an explicitly constructed source and tests can
//! substitute their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinwatch_core::{CoinGeckoSource, MarketDataSource, MarketQuery};
//!
//! async fn top_coins(source: &CoinGeckoSource) {
//!     match source.fetch_markets(&MarketQuery::DEFAULT).await {
//!         Ok(entries) => println!("{} coins", entries.len()),
//!         Err(error) => eprintln!("fetch failed: {error}"),
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::{FetchError, MarketEntry};

/// Parameters of one page request against the markets listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketQuery {
    pub vs_currency: &'static str,
    pub order: &'static str,
    pub per_page: u16,
    pub page: u32,
    pub sparkline: bool,
}

impl MarketQuery {
    /// First hundred coins by market cap, priced in USD.
    pub const DEFAULT: Self = Self {
        vs_currency: "usd",
        order: "market_cap_desc",
        per_page: 100,
        page: 1,
        sparkline: false,
    };
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Remote list resource the market-data store reads from.
pub trait MarketDataSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Fetch one page of entries in server order.
    fn fetch_markets<'a>(
        &'a self,
        query: &'a MarketQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketEntry>, FetchError>> + Send + 'a>>;
}

mod coingecko;

pub use coingecko::{CoinGeckoConfig, CoinGeckoSource};

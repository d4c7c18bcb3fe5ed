use serde::{Deserialize, Serialize};

use super::{MarketEntry, UtcDateTime};

/// Observable state of the market-data store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    /// Entries in server response order.
    pub entries: Vec<MarketEntry>,
    pub is_loading: bool,
    /// Description of the last failed fetch; cleared when a new fetch starts.
    pub error: Option<String>,
    /// When the current `entries` were applied.
    pub last_updated: Option<UtcDateTime>,
}

impl MarketDataSnapshot {
    pub fn entry(&self, id: &str) -> Option<&MarketEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

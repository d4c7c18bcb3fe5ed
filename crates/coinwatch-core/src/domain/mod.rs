//! # Domain Models
//!
//! Value types shared by the stores and their observers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MarketEntry`] | One validated row of market data |
//! | [`MarketDataSnapshot`] | Observable state of the market-data store |
//! | [`AuthSession`] | Authentication status variants |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! `MarketEntry` enforces its numeric invariants at construction time, both
//! through [`MarketEntry::new`] and when decoded from the wire:
//!
//! ```rust
//! use coinwatch_core::{MarketEntry, ValidationError};
//!
//! let entry = MarketEntry::new("bitcoin", "btc", "Bitcoin", "", 65000.5, -2.3, 1.2e12).unwrap();
//! assert_eq!(entry.current_price(), 65000.5);
//!
//! let invalid = MarketEntry::new("bitcoin", "btc", "Bitcoin", "", -1.0, 0.0, 0.0);
//! assert!(matches!(invalid, Err(ValidationError::NegativeValue { .. })));
//! ```

mod entry;
mod session;
mod snapshot;
mod timestamp;

pub use entry::MarketEntry;
pub use session::AuthSession;
pub use snapshot::MarketDataSnapshot;
pub use timestamp::UtcDateTime;

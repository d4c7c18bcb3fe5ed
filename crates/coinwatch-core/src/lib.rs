//! # Coinwatch Core
//!
//! State-synchronization layer for the coinwatch market viewer.
//!
//! ## Overview
//!
//! Two independent stores, each owning its state and exposing read-only
//! observation plus a fixed set of mutating operations:
//!
//! - [`MarketDataStore`] fetches one page of market data and publishes
//!   loading / error / entries as a [`MarketDataSnapshot`]
//! - [`AuthSessionController`] runs the sign-in / sign-up / sign-out state
//!   machine and publishes the current [`AuthSession`]
//!
//! Presentation code renders snapshots, calls the operations on user input
//! and derives navigation from the session through [`navigation`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Market-data source adapters (CoinGecko) |
//! | [`auth`] | Session controller and identity-service contract |
//! | [`data_source`] | Market-data source trait and query constants |
//! | [`display`] | Price and market-cap formatting |
//! | [`domain`] | Domain models (MarketEntry, snapshots, sessions) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`market_store`] | Observable market-data store |
//! | [`navigation`] | Session-driven routing |
//! | [`observable`] | Publish/subscribe cell used by both stores |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coinwatch_core::{CoinGeckoSource, MarketDataStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MarketDataStore::new(Arc::new(CoinGeckoSource::default()));
//!     let snapshot = store.settled().await;
//!
//!     match snapshot.error {
//!         Some(error) => eprintln!("{error}"),
//!         None => println!("{} coins", snapshot.entries.len()),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │  Presentation (CLI)  │───────▶│  AuthSessionController   │
//! └──────────┬───────────┘        └────────────┬─────────────┘
//!            │                                 │
//!            ▼                                 ▼
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │   MarketDataStore    │        │  IdentityService (trait) │
//! └──────────┬───────────┘        └──────────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │  MarketDataSource    │───────▶│  HttpClient              │
//! │  (CoinGecko adapter) │        │  (reqwest / fixture)     │
//! └──────────────────────┘        └──────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Stores never return fetch or identity failures. They fold them into
//! state: `MarketDataSnapshot::error` and `AuthSession::Error`. The only
//! `Err` a store operation returns is [`AuthCommandError`], for commands
//! issued from a state that does not accept them.

pub mod adapters;
pub mod auth;
pub mod data_source;
pub mod display;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod market_store;
pub mod navigation;
pub mod observable;

// Adapter implementations
pub use adapters::{CoinGeckoConfig, CoinGeckoSource};

// Authentication
pub use auth::{
    AuthCommand, AuthCommandError, AuthError, AuthErrorKind, AuthSessionController,
    IdentityFuture, IdentityService, InMemoryIdentityService,
};

// Data source trait and types
pub use data_source::{MarketDataSource, MarketQuery};

// Display helpers
pub use display::{EntryView, PriceDirection};

// Domain models
pub use domain::{AuthSession, MarketDataSnapshot, MarketEntry, UtcDateTime};

// Error types
pub use error::{FetchError, ValidationError};

// HTTP client types
pub use http_client::{FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Stores
pub use market_store::{MarketDataStore, RefreshHandle};
pub use navigation::{route_for, NavigationGuard, Route};
pub use observable::{StateChannel, Transitions};

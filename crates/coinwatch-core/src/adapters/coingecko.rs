use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::data_source::{MarketDataSource, MarketQuery};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{FetchError, MarketEntry};

/// Connection settings for the CoinGecko-compatible markets endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinGeckoConfig {
    /// API root, without the `/coins/markets` path.
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.coingecko.com/api/v3"),
            timeout_ms: 10_000,
            user_agent: format!("coinwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CoinGeckoConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url.trim_end_matches('/'))
    }
}

/// Markets source backed by `GET /coins/markets`.
#[derive(Clone)]
pub struct CoinGeckoSource {
    config: CoinGeckoConfig,
    http_client: Arc<dyn HttpClient>,
}

impl Default for CoinGeckoSource {
    fn default() -> Self {
        let config = CoinGeckoConfig::default();
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self {
            config,
            http_client,
        }
    }
}

impl CoinGeckoSource {
    pub fn new(config: CoinGeckoConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Default configuration over a caller-supplied transport.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(CoinGeckoConfig::default(), http_client)
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }

    fn build_request(&self, query: &MarketQuery) -> HttpRequest {
        HttpRequest::get(self.config.markets_url())
            .with_query("vs_currency", query.vs_currency)
            .with_query("order", query.order)
            .with_query("per_page", query.per_page)
            .with_query("page", query.page)
            .with_query("sparkline", query.sparkline)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms)
    }
}

impl MarketDataSource for CoinGeckoSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    fn fetch_markets<'a>(
        &'a self,
        query: &'a MarketQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketEntry>, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(query);
            debug!(url = %request.full_url(), "requesting market listing");

            let response = self.http_client.execute(request).await?;
            if !response.is_success() {
                return Err(FetchError::Status {
                    status: response.status,
                });
            }

            parse_markets_response(&response.body)
        })
    }
}

fn parse_markets_response(body: &str) -> Result<Vec<MarketEntry>, FetchError> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body)?;
    debug!(count = entries.len(), "decoded market listing");
    Ok(entries)
}

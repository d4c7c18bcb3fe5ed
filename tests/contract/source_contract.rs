use std::sync::Arc;

use coinwatch_core::{
    CoinGeckoConfig, CoinGeckoSource, FetchError, FixtureHttpClient, MarketDataSource,
    MarketEntry, MarketQuery,
};

const FIXTURE: &str = include_str!("../../crates/coinwatch-cli/fixtures/markets.json");

fn source_with(client: FixtureHttpClient) -> (CoinGeckoSource, Arc<FixtureHttpClient>) {
    let client = Arc::new(client);
    let source = CoinGeckoSource::new(
        CoinGeckoConfig::default().with_base_url("https://mock.test/api/v3"),
        client.clone(),
    );
    (source, client)
}

#[tokio::test]
async fn fixture_decodes_in_server_order() {
    let (source, _) = source_with(FixtureHttpClient::ok_json(FIXTURE));

    let entries = source
        .fetch_markets(&MarketQuery::DEFAULT)
        .await
        .expect("fixture should decode");

    let ids: Vec<&str> = entries.iter().map(MarketEntry::id).collect();
    assert_eq!(
        ids,
        vec!["bitcoin", "ethereum", "tether", "solana", "freshly-listed"]
    );
    for entry in &entries {
        assert!(entry.current_price() >= 0.0, "{}: price", entry.id());
        assert!(entry.market_cap() >= 0.0, "{}: market cap", entry.id());
        assert!(!entry.symbol().is_empty(), "{}: symbol", entry.id());
    }
    assert_eq!(entries[4].price_change_percent_24h(), 0.0);
}

#[tokio::test]
async fn every_fetch_issues_exactly_one_get_to_the_markets_path() {
    let (source, client) = source_with(FixtureHttpClient::ok_json("[]"));

    source
        .fetch_markets(&MarketQuery::DEFAULT)
        .await
        .expect("empty list is valid");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].full_url(),
        "https://mock.test/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=100&page=1&sparkline=false"
    );
    assert_eq!(
        requests[0].headers.get("accept").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn failure_classes_are_distinguished() {
    let cases = [
        (FixtureHttpClient::status(500, "oops"), "status"),
        (FixtureHttpClient::status(404, "[]"), "status"),
        (FixtureHttpClient::ok_json("not json"), "decode"),
        (FixtureHttpClient::ok_json(r#"[{"id":"x"}]"#), "decode"),
        (FixtureHttpClient::failing("request timeout"), "transport"),
    ];

    for (client, expected) in cases {
        let (source, _) = source_with(client);
        let error = source
            .fetch_markets(&MarketQuery::DEFAULT)
            .await
            .expect_err("case must fail");

        let actual = match &error {
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Transport(_) => "transport",
        };
        assert_eq!(actual, expected, "unexpected class for {error:?}");
    }
}

//! Behavior tests for the indicator fetchers.
//!
//! These verify HOW acquisition failures and odd upstream payloads are
//! absorbed: every failure must land in the record's `error` field, never
//! escape as an `Err`, and never disturb the other indicators.

use marketmood_tests::*;

fn http(client: StaticHttpClient) -> Arc<dyn marketmood_core::HttpClient> {
    Arc::new(client)
}

// =============================================================================
// Mood index
// =============================================================================

#[tokio::test]
async fn mood_index_reads_the_page_state_blob() {
    let client = StaticHttpClient::new().with_body("market-mood-index", mood_page(47.3));
    let fetcher = MoodIndexFetcher::new(http(client));

    let reading = fetcher.fetch().await;

    assert_eq!(reading.value, Some(47.3));
    assert_eq!(reading.zone, MmiZone::Fear);
    assert!(reading.error.is_none());
}

#[tokio::test]
async fn mood_index_falls_back_to_a_text_scan_when_the_blob_is_missing() {
    // A page that lost its __NEXT_DATA__ script but still inlines the value.
    let body = r#"<html><script>var s={"widget":{"currentValue":12.75}}</script></html>"#;
    let client = StaticHttpClient::new().with_body("market-mood-index", body);
    let fetcher = MoodIndexFetcher::new(http(client));

    let reading = fetcher.fetch().await;

    assert_eq!(reading.value, Some(12.75));
    assert_eq!(reading.zone, MmiZone::ExtremeFear);
}

#[tokio::test]
async fn mood_index_page_without_a_value_is_unknown_not_error() {
    let client =
        StaticHttpClient::new().with_body("market-mood-index", "<html><body>soon</body></html>");
    let fetcher = MoodIndexFetcher::new(http(client));

    let reading = fetcher.fetch().await;

    assert_eq!(reading.value, None);
    assert_eq!(reading.zone, MmiZone::Unknown);
    assert!(reading.error.is_some());
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn market_fetch_needs_two_sessions_for_both_symbols() {
    let client = StaticHttpClient::new()
        .with_body("chart/%5ENSEI", chart_page(&[24_000.0, 24_100.0]))
        .with_body("chart/%5EINDIAVIX", chart_page(&[13.2]));
    let fetcher = MarketDataFetcher::new(http(client));

    let snapshot = fetcher.fetch().await;

    assert!(snapshot.data.is_none());
    assert!(snapshot
        .error
        .as_deref()
        .expect("error is recorded")
        .contains("insufficient history"));
}

#[tokio::test]
async fn market_fetch_fails_as_a_unit_when_one_symbol_is_down() {
    // Volatility endpoint rate limited: index data alone is not enough.
    let client = StaticHttpClient::new()
        .with_body("chart/%5ENSEI", chart_page(&[24_000.0, 24_100.0]))
        .with_response(
            "chart/%5EINDIAVIX",
            HttpResponse {
                status: 429,
                body: String::new(),
            },
        );
    let fetcher = MarketDataFetcher::new(http(client));

    let snapshot = fetcher.fetch().await;

    assert!(snapshot.data.is_none());
    assert!(snapshot
        .error
        .as_deref()
        .expect("error is recorded")
        .contains("status 429"));
}

// =============================================================================
// Institutional flow
// =============================================================================

#[tokio::test]
async fn flow_fetch_reads_nets_with_thousands_separators() {
    let client = StaticHttpClient::new().with_body(
        "fii_dii_activity",
        flow_page("04-Aug-2026", "-3,417.20", "2,910.55"),
    );
    let fetcher = FlowFetcher::new(http(client));

    let snapshot = fetcher.fetch().await;
    let data = snapshot.data.expect("snapshot should carry data");

    assert_eq!(data.date, "04-Aug-2026");
    assert_eq!(data.foreign_net, -3417.2);
    assert_eq!(data.domestic_net, 2910.55);
}

#[tokio::test]
async fn flow_fetch_without_a_table_reports_a_parse_error() {
    let client = StaticHttpClient::new()
        .with_body("fii_dii_activity", "<html><body>captcha</body></html>");
    let fetcher = FlowFetcher::new(http(client));

    let snapshot = fetcher.fetch().await;

    assert!(snapshot.data.is_none());
    assert_eq!(
        snapshot.error.as_deref(),
        Some("could not parse FII/DII table")
    );
}

// =============================================================================
// Isolation
// =============================================================================

#[tokio::test]
async fn a_failing_source_does_not_disturb_the_others() {
    // Mood index times out at the edge (404 here), the rest are healthy.
    let client = StaticHttpClient::new()
        .with_body("chart/%5ENSEI", chart_page(&[24_000.0, 24_100.0]))
        .with_body("chart/%5EINDIAVIX", chart_page(&[13.0, 12.4]))
        .with_body("fii_dii_activity", flow_page("04-Aug-2026", "512.00", "88.00"));
    let shared = http(client);

    let mood_fetcher = MoodIndexFetcher::new(shared.clone());
    let market_fetcher = MarketDataFetcher::new(shared.clone());
    let flow_fetcher = FlowFetcher::new(shared);
    let (mmi, market, flow) = tokio::join!(
        mood_fetcher.fetch(),
        market_fetcher.fetch(),
        flow_fetcher.fetch(),
    );

    assert!(mmi.error.is_some());
    assert!(market.data.is_some());
    assert!(flow.data.is_some());
}

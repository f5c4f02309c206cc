use coinchart::core::chart::{ComparisonChart, PriceChart};
use coinchart::core::{Notice, Timeframe};
use coinchart::dashboard::Dashboard;
use coinchart::providers::caching::CachingMarketDataProvider;
use coinchart::providers::coingecko::CoinGeckoProvider;
use std::fs;
use std::time::Duration;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const MARKETS: &str = r#"[
        {
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 43210.5,
            "market_cap": 846000000000,
            "market_cap_rank": 1,
            "price_change_percentage_24h_in_currency": -1.2,
            "price_change_percentage_7d_in_currency": 3.4,
            "price_change_percentage_30d_in_currency": 10.5,
            "price_change_percentage_1y_in_currency": 120.0
        },
        {
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "current_price": 2345.67,
            "market_cap": 281500000000,
            "market_cap_rank": 2,
            "price_change_percentage_24h_in_currency": 0.8
        }
    ]"#;

    /// Daily prices starting 2024-01-01 UTC.
    pub fn market_chart(prices: &[f64]) -> String {
        let start = 1_704_067_200_000_i64;
        let day = 86_400_000_i64;
        let pairs: Vec<String> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[{}, {p}]", start + i as i64 * day))
            .collect();
        let pairs = pairs.join(", ");
        format!(r#"{{"prices": [{pairs}], "market_caps": [{pairs}], "total_volumes": [{pairs}]}}"#)
    }

    pub async fn create_mock_server() -> MockServer {
        create_mock_server_in("usd").await
    }

    pub async fn create_mock_server_in(currency: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", currency))
            .respond_with(ResponseTemplate::new(200).set_body_string(MARKETS))
            .mount(&mock_server)
            .await;

        for (asset_id, prices) in [
            ("bitcoin", [40000.0, 41000.0, 42500.0, 43210.5]),
            ("ethereum", [2500.0, 2400.0, 2380.0, 2345.67]),
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/coins/{asset_id}/market_chart")))
                .respond_with(ResponseTemplate::new(200).set_body_string(market_chart(&prices)))
                .mount(&mock_server)
                .await;
        }

        mock_server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        write_config_in(file, base_url, "usd");
    }

    pub fn write_config_in(file: &tempfile::NamedTempFile, base_url: &str, currency: &str) {
        let config_content = format!(
            r#"
        providers:
          coingecko:
            base_url: {base_url}
        currency: "{currency}"
        asset_limit: 10
        stale_after_secs: 60
        default_timeframe: "1W"
    "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }

    /// Runs a command and returns everything it reported.
    pub async fn run_captured(
        command: coinchart::AppCommand,
        config_file: &tempfile::NamedTempFile,
    ) -> String {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        let result = coinchart::run_command_with_writer(
            command,
            Some(config_file.path().to_str().unwrap()),
            &mut out,
        )
        .await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
        String::from_utf8(out).expect("Output is not UTF-8")
    }
}

#[test_log::test(tokio::test)]
async fn test_top_command_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let output =
        test_utils::run_captured(coinchart::AppCommand::Top { limit: Some(5) }, &config_file)
            .await;
    info!("{output}");
    assert!(output.contains("Top Cryptocurrencies"));
    assert!(output.contains("Bitcoin"));
    assert!(output.contains("Ethereum"));
    assert!(output.contains("$43,210.50"));
    assert!(output.contains("$846.00B"));
}

#[test_log::test(tokio::test)]
async fn test_top_command_in_configured_currency() {
    let mock_server = test_utils::create_mock_server_in("eur").await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config_in(&config_file, &mock_server.uri(), "eur");

    let output =
        test_utils::run_captured(coinchart::AppCommand::Top { limit: None }, &config_file).await;
    assert!(output.contains("€43,210.50"));
    assert!(output.contains("€846.00B"));
    assert!(!output.contains('$'));
}

#[test_log::test(tokio::test)]
async fn test_chart_command_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let output = test_utils::run_captured(
        coinchart::AppCommand::Chart {
            asset_id: None,
            timeframe: Some(Timeframe::OneDay),
        },
        &config_file,
    )
    .await;
    assert!(output.contains("Bitcoin (BTC)"));
    assert!(output.contains("Price Chart 1D"));
    assert!(output.contains("Rank"));

    let output = test_utils::run_captured(
        coinchart::AppCommand::Chart {
            asset_id: Some("ethereum".to_string()),
            timeframe: None,
        },
        &config_file,
    )
    .await;
    assert!(output.contains("Ethereum (ETH)"));
    assert!(output.contains("Price Chart 1W"));
    assert!(!output.contains("Failed to load"));

    let output = test_utils::run_captured(
        coinchart::AppCommand::Chart {
            asset_id: Some("dogecoin".to_string()),
            timeframe: None,
        },
        &config_file,
    )
    .await;
    assert!(output.contains("Unknown asset: dogecoin"));
    assert!(!output.contains("Price Chart"));
}

#[test_log::test(tokio::test)]
async fn test_compare_command_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let output = test_utils::run_captured(
        coinchart::AppCommand::Compare {
            asset_ids: vec![
                "bitcoin".to_string(),
                "ethereum".to_string(),
                "bitcoin".to_string(),
                "dogecoin".to_string(),
            ],
            timeframe: None,
        },
        &config_file,
    )
    .await;
    assert!(output.contains("Added Bitcoin to comparison"));
    assert!(output.contains("Added Ethereum to comparison"));
    assert!(output.contains("Bitcoin is already in your comparison list"));
    assert!(output.contains("Unknown asset: dogecoin"));
    assert!(output.contains("Comparison View 1W"));
    assert!(!output.contains("Failed to load comparison data"));
}

#[test_log::test(tokio::test)]
async fn test_compare_reports_failing_asset_once() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = test_utils::create_mock_server().await;
    // takes precedence over the mounted success response
    Mock::given(method("GET"))
        .and(path("/coins/ethereum/market_chart"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&mock_server)
        .await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let output = test_utils::run_captured(
        coinchart::AppCommand::Compare {
            asset_ids: vec!["ethereum".to_string(), "bitcoin".to_string()],
            timeframe: None,
        },
        &config_file,
    )
    .await;
    assert_eq!(output.matches("Failed to load comparison data").count(), 1);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result = coinchart::run_command(
        coinchart::AppCommand::Top { limit: None },
        Some("/nonexistent/coinchart/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_unavailable_api_still_completes() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = coinchart::run_command(
        coinchart::AppCommand::Chart {
            asset_id: None,
            timeframe: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Chart command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_dashboard_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let provider = CachingMarketDataProvider::new(
        CoinGeckoProvider::new(&mock_server.uri(), "usd").expect("Failed to create provider"),
        Duration::from_secs(60),
    );
    let mut dashboard = Dashboard::new(provider, Timeframe::OneMonth, 10);

    assert!(dashboard.load_assets().await.is_none());
    assert_eq!(
        dashboard.state().selected_asset().map(|a| a.id.as_str()),
        Some("bitcoin")
    );

    assert!(dashboard.refresh_selected().await.is_none());
    let PriceChart::Ready(chart) = dashboard.state().price_chart() else {
        panic!("Expected a price chart");
    };
    info!(labels = ?chart.labels, "Built price chart");
    assert_eq!(chart.labels, vec!["Jan 1", "Jan 2", "Jan 3", "Jan 4"]);
    assert_eq!(chart.datasets[0].border_color, "rgb(74, 222, 128)");

    let notices = dashboard.add_to_comparison("bitcoin").await;
    assert_eq!(
        notices,
        vec![Notice::Added {
            name: "Bitcoin".to_string()
        }]
    );
    dashboard.add_to_comparison("ethereum").await;

    let ComparisonChart::Ready(chart) = dashboard.state().comparison_chart() else {
        panic!("Expected a comparison chart");
    };
    assert_eq!(chart.datasets.len(), 2);
    assert!(chart.show_legend);
    assert_eq!(chart.datasets[0].label, "BTC");
    assert_eq!(chart.datasets[1].data, vec![2500.0, 2400.0, 2380.0, 2345.67]);

    // served from the caching provider after the first round
    let requests_before = mock_server.received_requests().await.unwrap_or_default().len();
    dashboard.refresh_comparison().await;
    let requests_after = mock_server.received_requests().await.unwrap_or_default().len();
    assert_eq!(requests_before, requests_after);

    let notices = dashboard.set_timeframe(Timeframe::OneYear).await;
    assert!(notices.is_empty());
    let PriceChart::Ready(chart) = dashboard.state().price_chart() else {
        panic!("Expected a price chart");
    };
    assert_eq!(chart.labels[0], "Jan 2024");
}

#[test]
fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.yaml");

    coinchart::cli::setup::setup_at_path(&config_path).expect("Setup failed");
    let config = coinchart::core::config::AppConfig::load_from_path(&config_path)
        .expect("Failed to load config");
    assert_eq!(config.timeframe(), Timeframe::OneMonth);
    assert!(fs::read_to_string(&config_path).unwrap().contains("coingecko"));
}

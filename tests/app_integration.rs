use fxdash::core::config::AppConfig;
use fxdash::core::currency::CatalogProvider;
use fxdash::providers::caching::CachingCatalogProvider;
use fxdash::providers::frankfurter::FrankfurterProvider;
use std::fs;
use std::time::Duration;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const LATEST_JSON: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "date": "2025-10-10",
        "rates": {"EUR": 0.86, "GBP": 0.75, "JPY": 152.5}
    }"#;

    pub const NAMES_JSON: &str = r#"{
        "EUR": "Euro",
        "GBP": "British Pound",
        "JPY": "Japanese Yen",
        "USD": "United States Dollar"
    }"#;

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LATEST_JSON))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NAMES_JSON))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          frankfurter:
            base_url: {base_url}
        anchor: "USD"
        currencies:
          - code: "USD"
            entity: "United States"
          - code: "EUR"
            entity: "European Union"
          - code: "GBP"
            entity: "United Kingdom"
          - code: "JPY"
            entity: "Japan"
        overview_limit: 2
    "#
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    let commands = [
        fxdash::AppCommand::Currencies,
        fxdash::AppCommand::Convert {
            amount: "1,000.559".to_string(),
            from: Some("eur".to_string()),
            to: Some("JPY".to_string()),
            commission_type: Some(fxdash::core::CommissionKind::Fixed),
            commission: Some("12.5".to_string()),
        },
        fxdash::AppCommand::Rates {
            base: Some("GBP".to_string()),
            limit: None,
        },
    ];

    for command in commands {
        let result = fxdash::run_command(command.clone(), Some(config_path)).await;
        assert!(
            result.is_ok(),
            "Command {command:?} failed with: {:?}",
            result.err()
        );
    }

    // Each command fetched a fresh catalog: one /latest and one /currencies call
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
    let latest: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/latest")
        .collect();
    assert_eq!(latest.len(), 3);
    for request in latest {
        assert_eq!(request.url.query(), Some("from=USD&to=EUR,GBP,JPY"));
    }
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_is_rejected() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxdash::run_command(
        fxdash::AppCommand::Rates {
            base: Some("XYZ".to_string()),
            limit: Some(5),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Unknown currency: XYZ"));
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_aborts_command() {
    let mock_server = wiremock::MockServer::start().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxdash::run_command(
        fxdash::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Upstream unavailable"));
}

#[test_log::test(tokio::test)]
async fn test_dashboard_session_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let provider = CachingCatalogProvider::new(
        FrankfurterProvider::new(&config.providers.frankfurter, &config.anchor, &config.currencies)
            .unwrap(),
        Duration::from_secs(config.refresh_interval_secs),
    );

    let input: &[u8] = b"amount 0100.999\nfee percentage 10\npick to\ngbp\nbase EUR\nrefresh\nquit\namount 5\n";
    let mut output = Vec::new();
    fxdash::cli::dashboard::run_session(&provider, &config, input, &mut output)
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    info!(%output, "Dashboard output");
    assert!(output.contains("100.99 USD"));
    assert!(output.contains("Commission (10%)"));
    assert!(output.contains("Market Rate: 1 USD = 0.75 GBP"));
    assert!(output.contains("1 Euro (EUR) equals:"));
    // Input after quit is never processed
    assert!(!output.contains(" 5 USD "));

    // The refresh within the interval reused the cached catalog
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_dashboard_reload_bypasses_cache() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let provider = CachingCatalogProvider::new(
        FrankfurterProvider::new(&config.providers.frankfurter, &config.anchor, &config.currencies)
            .unwrap(),
        Duration::from_secs(config.refresh_interval_secs),
    );

    let input: &[u8] = b"reload\n";
    let mut output = Vec::new();
    fxdash::cli::dashboard::run_session(&provider, &config, input, &mut output)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access"]
async fn test_real_frankfurter_api() {
    let config = AppConfig::default();
    let provider =
        FrankfurterProvider::new(&config.providers.frankfurter, &config.anchor, &config.currencies)
            .unwrap();

    info!("Fetching catalog from Frankfurter");
    match provider.fetch_catalog().await {
        Ok(catalog) => {
            info!(?catalog, "Received successful catalog");
            assert_eq!(catalog.records().len(), config.currencies.len());
            assert_eq!(catalog.rate("USD"), Some(1.0));
            assert!(catalog.records().iter().all(|r| r.rate > 0.0));
        }
        Err(e) => {
            error!("Catalog request failed: {e}\n{e:?}");
            panic!("Catalog request failed: {e}");
        }
    }
}

#[test]
fn test_config_file_round_trip_from_disk() {
    let config_file = test_utils::write_config("http://localhost:1234");
    let content = fs::read_to_string(config_file.path()).unwrap();
    assert!(content.contains("localhost:1234"));

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    assert_eq!(config.overview_limit, 2);
    assert_eq!(
        config.tracked_codes().collect::<Vec<_>>(),
        vec!["USD", "EUR", "GBP", "JPY"]
    );
}

use super::util::with_retry;
use crate::core::config::{FrankfurterProviderConfig, TrackedCurrency};
use crate::core::currency::{CatalogProvider, CurrencyCatalog, CurrencyRecord, ProviderError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    amount: f64,
    base: String,
    date: NaiveDate,
    rates: HashMap<String, f64>,
}

type CurrencyNames = HashMap<String, String>;

/// Catalog provider backed by the Frankfurter API.
///
/// Rates and names come from two requests issued concurrently; the catalog is
/// only built when both succeed.
pub struct FrankfurterProvider {
    base_url: String,
    anchor: String,
    currencies: Vec<TrackedCurrency>,
    retries: usize,
    retry_delay_ms: u64,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(
        config: &FrankfurterProviderConfig,
        anchor: &str,
        currencies: &[TrackedCurrency],
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent("fxdash/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::UpstreamUnavailable {
                endpoint: config.base_url.clone(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anchor: anchor.to_string(),
            currencies: currencies.to_vec(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            client,
        })
    }

    fn latest_url(&self) -> String {
        let targets: Vec<&str> = self
            .currencies
            .iter()
            .map(|c| c.code.as_str())
            .filter(|code| *code != self.anchor)
            .collect();
        format!(
            "{}/latest?from={}&to={}",
            self.base_url,
            self.anchor,
            targets.join(",")
        )
    }

    fn currencies_url(&self) -> String {
        format!("{}/currencies", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        debug!("Requesting {}", url);

        let response = with_retry(|| self.client.get(url).send(), self.retries, self.retry_delay_ms)
            .await
            .map_err(|e| ProviderError::UpstreamUnavailable {
                endpoint: url.to_string(),
                reason: format!("Request error: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamUnavailable {
                endpoint: url.to_string(),
                reason: format!("HTTP error: {}", response.status()),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::UpstreamMalformed {
                endpoint: url.to_string(),
                reason: format!("Failed to read body: {e}"),
            })?;

        serde_json::from_str(&text).map_err(|e| ProviderError::UpstreamMalformed {
            endpoint: url.to_string(),
            reason: format!("Failed to parse JSON response: {e}"),
        })
    }

    fn build_catalog(
        &self,
        latest: LatestRatesResponse,
        names: &CurrencyNames,
    ) -> Result<CurrencyCatalog, ProviderError> {
        let mut rates = latest.rates;
        rates.entry(latest.base.clone()).or_insert(latest.amount);

        let records = self
            .currencies
            .iter()
            .map(|tracked| {
                let code = tracked.code.as_str();
                let name = names.get(code).ok_or_else(|| ProviderError::MissingField {
                    code: code.to_string(),
                    field: "name",
                })?;
                let rate = *rates.get(code).ok_or_else(|| ProviderError::MissingField {
                    code: code.to_string(),
                    field: "rate",
                })?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(ProviderError::UpstreamMalformed {
                        endpoint: self.latest_url(),
                        reason: format!("Invalid rate {rate} for {code}"),
                    });
                }

                Ok(CurrencyRecord {
                    code: code.to_string(),
                    name: name.clone(),
                    entity: tracked.entity.clone(),
                    rate,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        CurrencyCatalog::new(&latest.base, latest.date, records)
    }
}

#[async_trait]
impl CatalogProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterCatalogFetch", skip(self), fields(anchor = %self.anchor))]
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, ProviderError> {
        let latest_url = self.latest_url();
        let currencies_url = self.currencies_url();

        let (latest, names) = futures::try_join!(
            self.get_json::<LatestRatesResponse>(&latest_url),
            self.get_json::<CurrencyNames>(&currencies_url),
        )?;

        debug!(
            base = %latest.base,
            date = %latest.date,
            rates = latest.rates.len(),
            names = names.len(),
            "Received upstream data"
        );

        if latest.base != self.anchor {
            return Err(ProviderError::UpstreamMalformed {
                endpoint: latest_url,
                reason: format!("Expected base {} but got {}", self.anchor, latest.base),
            });
        }

        self.build_catalog(latest, &names)
    }
}

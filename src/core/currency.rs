//! Currency catalog abstractions

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A tracked currency enriched with upstream data.
///
/// `rate` is the value of one unit of the anchor currency expressed in this
/// currency. The anchor's own record carries the upstream `amount` (normally 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    pub code: String,
    pub name: String,
    pub entity: String,
    pub rate: f64,
}

/// Ordered, read-only set of currency records for a session.
///
/// Order is the configured priority order. Each code appears exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyCatalog {
    anchor: String,
    date: NaiveDate,
    records: Vec<CurrencyRecord>,
}

impl CurrencyCatalog {
    pub fn new(
        anchor: &str,
        date: NaiveDate,
        records: Vec<CurrencyRecord>,
    ) -> Result<Self, ProviderError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.code.as_str()) {
                return Err(ProviderError::DuplicateCode(record.code.clone()));
            }
        }

        Ok(Self {
            anchor: anchor.to_string(),
            date,
            records,
        })
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Publication date of the upstream rates.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn records(&self) -> &[CurrencyRecord] {
        &self.records
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.get(code).map(|r| r.rate)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.code.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Upstream unavailable: {endpoint}: {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },
    #[error("Malformed response from {endpoint}: {reason}")]
    UpstreamMalformed { endpoint: String, reason: String },
    #[error("No {field} found for currency: {code}")]
    MissingField { code: String, field: &'static str },
    #[error("Duplicate currency in catalog: {0}")]
    DuplicateCode(String),
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, ProviderError>;
}

use crate::core::conversion::CommissionKind;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.frankfurter.app";
pub const API_URL_ENV: &str = "FXDASH_API_URL";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrackedCurrency {
    pub code: String,
    /// Issuing country or region, informational only.
    pub entity: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for FrankfurterProviderConfig {
    fn default() -> Self {
        FrankfurterProviderConfig {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            retries: 0,
            retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub frankfurter: FrankfurterProviderConfig,
}

/// Initial selections for converter and overview.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub amount: String,
    pub from: String,
    pub to: String,
    pub base: String,
    pub commission_type: CommissionKind,
    pub commission: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            amount: "1.0".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
            base: "USD".to_string(),
            commission_type: CommissionKind::Percentage,
            commission: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Currency all upstream rates are quoted against.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    /// Tracked currencies in display order.
    #[serde(default = "default_currencies")]
    pub currencies: Vec<TrackedCurrency>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_overview_limit")]
    pub overview_limit: usize,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_anchor() -> String {
    "USD".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_overview_limit() -> usize {
    12
}

fn default_currencies() -> Vec<TrackedCurrency> {
    [
        ("USD", "United States"),
        ("EUR", "European Union"),
        ("JPY", "Japan"),
        ("GBP", "United Kingdom"),
        ("AUD", "Australia"),
        ("CAD", "Canada"),
        ("CHF", "Switzerland"),
        ("CNY", "China"),
        ("SGD", "Singapore"),
        ("NZD", "New Zealand"),
        ("MXN", "Mexico"),
        ("BRL", "Brazil"),
        ("INR", "India"),
    ]
    .into_iter()
    .map(|(code, entity)| TrackedCurrency {
        code: code.to_string(),
        entity: entity.to_string(),
    })
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            anchor: default_anchor(),
            currencies: default_currencies(),
            refresh_interval_secs: default_refresh_interval_secs(),
            overview_limit: default_overview_limit(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults if
    /// no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            let mut config = Self::default();
            config.apply_env_overrides(|key| std::env::var(key).ok());
            return Ok(config);
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxdash", "fxdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            debug!("Overriding API url from {}: {}", API_URL_ENV, url);
            self.providers.frankfurter.base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            bail!("At least one currency must be tracked");
        }

        let mut seen = HashSet::new();
        for currency in &self.currencies {
            if !is_currency_code(&currency.code) {
                bail!("Invalid currency code: {}", currency.code);
            }
            if !seen.insert(currency.code.as_str()) {
                bail!("Currency listed more than once: {}", currency.code);
            }
        }

        if !is_currency_code(&self.anchor) {
            bail!("Invalid anchor currency: {}", self.anchor);
        }
        for (field, code) in [
            ("from", &self.defaults.from),
            ("to", &self.defaults.to),
            ("base", &self.defaults.base),
        ] {
            if !self.tracked_codes().any(|c| c == code.as_str()) {
                bail!("Default {field} currency is not tracked: {code}");
            }
        }
        if self.overview_limit == 0 {
            bail!("overview_limit must be positive");
        }
        Ok(())
    }

    pub fn tracked_codes(&self) -> impl Iterator<Item = &str> {
        self.currencies.iter().map(|c| c.code.as_str())
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  frankfurter:
    base_url: "http://example.com/fx"
    retries: 2
anchor: "EUR"
currencies:
  - code: "EUR"
    entity: "European Union"
  - code: "USD"
    entity: "United States"
  - code: "INR"
    entity: "India"
refresh_interval_secs: 60
overview_limit: 2
defaults:
  from: "EUR"
  to: "INR"
  commission_type: fixed
  commission: 2.5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.frankfurter.base_url, "http://example.com/fx");
        assert_eq!(config.providers.frankfurter.retries, 2);
        assert_eq!(config.providers.frankfurter.timeout_secs, 10);
        assert_eq!(config.anchor, "EUR");
        assert_eq!(
            config.tracked_codes().collect::<Vec<_>>(),
            vec!["EUR", "USD", "INR"]
        );
        assert_eq!(config.currencies[2].entity, "India");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.overview_limit, 2);
        assert_eq!(config.defaults.from, "EUR");
        assert_eq!(config.defaults.to, "INR");
        assert_eq!(config.defaults.base, "USD");
        assert_eq!(config.defaults.amount, "1.0");
        assert_eq!(config.defaults.commission_type, CommissionKind::Fixed);
        assert_eq!(config.defaults.commission, 2.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.providers.frankfurter.base_url, DEFAULT_API_URL);
        assert_eq!(config.anchor, "USD");
        assert_eq!(config.currencies.len(), 13);
        assert_eq!(config.currencies[0].code, "USD");
        assert_eq!(config.currencies[12].code, "INR");
        assert_eq!(config.refresh_interval_secs, 3600);
        assert_eq!(config.overview_limit, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_codes() {
        let mut config = AppConfig::default();
        config.currencies.push(TrackedCurrency {
            code: "EUR".to_string(),
            entity: "Again".to_string(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once: EUR"));

        let mut config = AppConfig::default();
        config.currencies[1].code = "euro".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.currencies.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.overview_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_provider_block_keeps_defaults() {
        let yaml_str = r#"
providers:
  frankfurter:
    timeout_secs: 5
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.frankfurter.base_url, DEFAULT_API_URL);
        assert_eq!(config.providers.frankfurter.timeout_secs, 5);
        assert_eq!(config.providers.frankfurter.retries, 0);
        assert_eq!(config.providers.frankfurter.retry_delay_ms, 500);
    }

    #[test]
    fn test_validate_rejects_untracked_defaults() {
        let mut config = AppConfig::default();
        config.defaults.to = "XXX".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Default to currency is not tracked: XXX");

        let mut config = AppConfig::default();
        config.defaults.base = "SEK".to_string();
        assert!(config.validate().is_err());

        let yaml_str = r#"
currencies:
  - code: "EUR"
    entity: "European Union"
  - code: "GBP"
    entity: "United Kingdom"
defaults:
  to: "GBP"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Default from currency is not tracked: USD"));
    }

    #[test]
    fn test_env_override_of_api_url() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| {
            (key == API_URL_ENV).then(|| " http://localhost:9000 ".to_string())
        });
        assert_eq!(config.providers.frankfurter.base_url, "http://localhost:9000");

        let mut config = AppConfig::default();
        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.providers.frankfurter.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_load_from_path_reports_invalid_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "overview_limit: 0\n").unwrap();
        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}

pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::convert::ConversionRequest;
use crate::core::config::AppConfig;
use crate::core::conversion::{Commission, CommissionKind};
use crate::core::currency::CurrencyCatalog;
use crate::core::input::sanitize_amount;
use crate::providers::caching::CachingCatalogProvider;
use crate::providers::frankfurter::FrankfurterProvider;
use anyhow::{Result, bail};
use std::time::Duration;
use tracing::{debug, info};

/// Commands the application can run once the configuration is loaded.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Currencies,
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        commission_type: Option<CommissionKind>,
        commission: Option<String>,
    },
    Rates {
        base: Option<String>,
        limit: Option<usize>,
    },
    Dashboard,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxdash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let frankfurter =
        FrankfurterProvider::new(&config.providers.frankfurter, &config.anchor, &config.currencies)?;
    let provider = CachingCatalogProvider::new(
        frankfurter,
        Duration::from_secs(config.refresh_interval_secs),
    );

    match command {
        AppCommand::Currencies => {
            let catalog = cli::ui::fetch_catalog(&provider).await?;
            cli::currencies::run(&catalog);
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            commission_type,
            commission,
        } => {
            let Some(amount_text) = sanitize_amount(&amount) else {
                bail!("Invalid amount: {}", amount);
            };
            let kind = commission_type.unwrap_or(config.defaults.commission_type);
            let commission = match commission {
                Some(raw) => Commission::from_input(kind, &raw),
                None => Commission::new(kind, config.defaults.commission),
            };

            let catalog = cli::ui::fetch_catalog(&provider).await?;
            let request = ConversionRequest {
                amount: amount_text,
                from: resolve_code(&catalog, from, &config.defaults.from)?,
                to: resolve_code(&catalog, to, &config.defaults.to)?,
                commission,
            };
            cli::convert::run(&catalog, &request);
        }
        AppCommand::Rates { base, limit } => {
            let limit = limit.unwrap_or(config.overview_limit);
            if limit == 0 {
                bail!("Limit must be positive");
            }
            let catalog = cli::ui::fetch_catalog(&provider).await?;
            let base = resolve_code(&catalog, base, &config.defaults.base)?;
            cli::rates::run(&catalog, &base, limit);
        }
        AppCommand::Dashboard => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            cli::dashboard::run_session(&provider, &config, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Picks the requested code (or the default) and checks it is tracked.
fn resolve_code(catalog: &CurrencyCatalog, requested: Option<String>, default: &str) -> Result<String> {
    let code = requested
        .map(|c| c.trim().to_ascii_uppercase())
        .unwrap_or_else(|| default.to_string());
    if !catalog.contains(&code) {
        let known: Vec<&str> = catalog.codes().collect();
        bail!("Unknown currency: {} (tracked: {})", code, known.join(", "));
    }
    Ok(code)
}

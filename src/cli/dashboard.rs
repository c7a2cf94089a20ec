//! Interactive dashboard driven by line commands.
//!
//! The session owns the catalog and the user's selections. Every command
//! updates the selections and the whole view is derived again from scratch.
use super::convert::{self, ConversionRequest};
use super::rates;
use super::selector::Selector;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::conversion::{Commission, CommissionKind};
use crate::core::currency::{CatalogProvider, CurrencyCatalog};
use crate::core::input::normalize_amount;
use crate::providers::caching::CachingCatalogProvider;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  amount TEXT              set the amount to convert
  from CODE | to CODE      choose source or destination currency
  base CODE                choose the overview base currency
  pick from|to|base        open or close a currency picker
  swap                     swap source and destination
  fee percentage|fixed V   simulate a transfer commission
  fee off                  remove the commission
  refresh                  reload rates if the cached ones are stale
  reload                   reload rates now
  help                     show this help
  quit                     leave the dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    From,
    To,
    Base,
}

impl std::str::FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "from" => Ok(Field::From),
            "to" => Ok(Field::To),
            "base" => Ok(Field::Base),
            _ => Err(anyhow::anyhow!("Unknown field: {}", s)),
        }
    }
}

/// What the session loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Render,
    Message(String),
    Options(Vec<String>),
    Help,
    Refresh,
    Reload,
    Quit,
}

pub struct Dashboard {
    catalog: CurrencyCatalog,
    request: ConversionRequest,
    base: String,
    overview_limit: usize,
    selector: Selector,
    picking: Field,
}

impl Dashboard {
    pub fn new(catalog: CurrencyCatalog, config: &AppConfig) -> Self {
        let defaults = &config.defaults;
        let request = ConversionRequest {
            amount: normalize_amount(&defaults.amount, ""),
            from: defaults.from.clone(),
            to: defaults.to.clone(),
            commission: Commission::new(defaults.commission_type, defaults.commission),
        };

        Self {
            catalog,
            request,
            base: defaults.base.clone(),
            overview_limit: config.overview_limit,
            selector: Selector::new(),
            picking: Field::From,
        }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn set_catalog(&mut self, catalog: CurrencyCatalog) {
        self.catalog = catalog;
    }

    pub fn handle_line(&mut self, line: &str) -> Action {
        let line = line.trim();

        if self.selector.is_open() {
            let code = line.to_ascii_uppercase();
            if self.catalog.contains(&code) {
                if let Some(code) = self.selector.select(&code) {
                    self.assign(self.picking, code);
                }
                return Action::Render;
            }
            // Anything but a listed code counts as a click elsewhere.
            if !line.to_ascii_lowercase().starts_with("pick") {
                self.selector.dismiss();
            }
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, r)| (c, r.trim()));

        match command.to_ascii_lowercase().as_str() {
            "" => Action::Render,
            "amount" => {
                self.request.amount = normalize_amount(rest, &self.request.amount);
                Action::Render
            }
            "from" | "to" | "base" => match command.parse::<Field>() {
                Ok(field) => self.choose(field, rest),
                Err(e) => Action::Message(e.to_string()),
            },
            "pick" => match rest.parse::<Field>() {
                Ok(field) => self.pick(field),
                Err(_) => Action::Message("Usage: pick from|to|base".to_string()),
            },
            "swap" => {
                self.request.swap();
                Action::Render
            }
            "fee" => self.set_fee(rest),
            "refresh" => Action::Refresh,
            "reload" => Action::Reload,
            "help" | "?" => Action::Help,
            "quit" | "exit" | "q" => Action::Quit,
            other => Action::Message(format!("Unknown command: {other} (try 'help')")),
        }
    }

    fn choose(&mut self, field: Field, code: &str) -> Action {
        let code = code.to_ascii_uppercase();
        if !self.catalog.contains(&code) {
            return Action::Message(format!("Unknown currency: {code}"));
        }
        self.assign(field, code);
        Action::Render
    }

    fn pick(&mut self, field: Field) -> Action {
        if self.selector.is_open() && self.picking != field {
            self.picking = field;
        } else {
            self.selector.toggle();
            self.picking = field;
        }

        if self.selector.is_open() {
            Action::Options(self.catalog.codes().map(str::to_string).collect())
        } else {
            Action::Render
        }
    }

    fn assign(&mut self, field: Field, code: String) {
        debug!(?field, %code, "Currency selected");
        match field {
            Field::From => self.request.from = code,
            Field::To => self.request.to = code,
            Field::Base => self.base = code,
        }
    }

    fn set_fee(&mut self, args: &str) -> Action {
        let mut parts = args.split_whitespace();
        let kind = match parts.next() {
            Some(kind) if kind.eq_ignore_ascii_case("off") => {
                self.request.commission = Commission::none();
                return Action::Render;
            }
            Some(kind) => kind,
            None => return Action::Message("Usage: fee percentage|fixed VALUE".to_string()),
        };

        match kind.parse::<CommissionKind>() {
            Ok(kind) => {
                let value: String = parts.collect();
                self.request.commission = Commission::from_input(kind, &value);
                Action::Render
            }
            Err(e) => Action::Message(e.to_string()),
        }
    }

    pub fn render(&self) -> String {
        let mut output = convert::render(&self.catalog, &self.request);
        output.push_str("\n\n");
        output.push_str(&rates::render(&self.catalog, &self.base, self.overview_limit));
        output
    }
}

/// Runs the dashboard until `quit` or end of input.
pub async fn run_session<T, R, W>(
    provider: &CachingCatalogProvider<T>,
    config: &AppConfig,
    input: R,
    output: &mut W,
) -> Result<()>
where
    T: CatalogProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let catalog = ui::fetch_catalog(provider).await?;
    let mut dashboard = Dashboard::new(catalog, config);
    writeln!(output, "{}", dashboard.render())?;
    writeln!(output, "{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle))?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match dashboard.handle_line(&line) {
            Action::Render => writeln!(output, "{}", dashboard.render())?,
            Action::Message(message) => {
                writeln!(output, "{}", ui::style_text(&message, ui::StyleType::Error))?
            }
            Action::Options(codes) => {
                for code in codes {
                    let name = dashboard
                        .catalog()
                        .get(&code)
                        .map_or("", |r| r.name.as_str());
                    writeln!(output, "  {code}  {name}")?;
                }
                writeln!(output, "Type a code to select it.")?;
            }
            Action::Help => writeln!(output, "{HELP}")?,
            Action::Refresh => {
                refresh(provider, &mut dashboard, output).await?;
            }
            Action::Reload => {
                provider.invalidate().await;
                refresh(provider, &mut dashboard, output).await?;
            }
            Action::Quit => break,
        }
        output.flush()?;
    }

    Ok(())
}

async fn refresh<T, W>(
    provider: &CachingCatalogProvider<T>,
    dashboard: &mut Dashboard,
    output: &mut W,
) -> Result<()>
where
    T: CatalogProvider,
    W: Write,
{
    // A failed refresh keeps the catalog already on screen.
    match ui::fetch_catalog(provider).await {
        Ok(catalog) => {
            dashboard.set_catalog(catalog);
            writeln!(output, "{}", dashboard.render())?;
        }
        Err(e) => {
            warn!(error = %e, "Refresh failed");
            writeln!(
                output,
                "{}",
                ui::style_text(&format!("{e:#}"), ui::StyleType::Error)
            )?;
        }
    }
    Ok(())
}

use super::ui;
use crate::core::conversion::{Commission, CommissionKind, ConversionQuote, convert};
use crate::core::currency::CurrencyCatalog;
use crate::core::format::{AMOUNT_DECIMALS, RATE_DECIMALS, format_max_decimals};
use crate::core::input::parse_amount;
use comfy_table::Cell;

/// Inputs of a single conversion, as edited by the user.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Canonical amount text, see [`crate::core::input::normalize_amount`].
    pub amount: String,
    pub from: String,
    pub to: String,
    pub commission: Commission,
}

impl ConversionRequest {
    pub fn quote(&self, catalog: &CurrencyCatalog) -> ConversionQuote {
        convert(
            parse_amount(&self.amount),
            &self.from,
            &self.to,
            &self.commission,
            catalog,
        )
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

pub fn run(catalog: &CurrencyCatalog, request: &ConversionRequest) {
    println!("{}", render(catalog, request));
}

pub fn describe_commission(commission: &Commission, from: &str) -> String {
    let value = format_max_decimals(commission.value, AMOUNT_DECIMALS);
    match commission.kind {
        CommissionKind::Percentage => format!("{value}%"),
        CommissionKind::Fixed => format!("{value} {from}"),
    }
}

pub fn render(catalog: &CurrencyCatalog, request: &ConversionRequest) -> String {
    let quote = request.quote(catalog);
    let from = request.from.as_str();
    let to = request.to.as_str();
    let name_of = |code: &str| {
        catalog
            .get(code)
            .map_or_else(|| code.to_string(), |r| r.name.clone())
    };
    let amount_display = if request.amount.is_empty() {
        "0"
    } else {
        request.amount.as_str()
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);
    table.add_row(vec![
        Cell::new(format!("From ({})", name_of(from))),
        ui::number_cell(&format!("{amount_display} {from}")),
    ]);
    table.add_row(vec![
        Cell::new(format!("To ({})", name_of(to))),
        ui::number_cell(&format!(
            "{} {to}",
            format_max_decimals(quote.gross_converted, AMOUNT_DECIMALS)
        )),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "Commission ({})",
            describe_commission(&request.commission, from)
        )),
        ui::number_cell(&format!(
            "{} {from}",
            format_max_decimals(quote.cost, AMOUNT_DECIMALS)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Net Received"),
        ui::highlight_cell(&format!(
            "{} {to}",
            format_max_decimals(quote.net_received, AMOUNT_DECIMALS)
        )),
    ]);

    format!(
        "{}\n{table}\n{}",
        ui::style_text("Currency Converter", ui::StyleType::Title),
        ui::style_text(
            &format!(
                "Market Rate: 1 {from} = {} {to} (rates as of {})",
                format_max_decimals(quote.cross_rate, RATE_DECIMALS),
                catalog.date()
            ),
            ui::StyleType::Subtle
        )
    )
}

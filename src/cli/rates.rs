use super::ui;
use crate::core::currency::CurrencyCatalog;
use crate::core::format::{AMOUNT_DECIMALS, format_max_decimals};
use crate::core::overview::rebase;
use comfy_table::Cell;

pub fn run(catalog: &CurrencyCatalog, base: &str, limit: usize) {
    println!("{}", render(catalog, base, limit));
}

/// Renders at most `limit` rebased rates for `base`.
pub fn render(catalog: &CurrencyCatalog, base: &str, limit: usize) -> String {
    let base_name = catalog.get(base).map_or(base, |r| r.name.as_str());

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
    ]);

    for rate in rebase(catalog, base).into_iter().take(limit) {
        table.add_row(vec![
            Cell::new(&rate.code),
            Cell::new(&rate.name),
            ui::number_cell(&format_max_decimals(rate.rate, AMOUNT_DECIMALS)),
        ]);
    }

    format!(
        "{}\n1 {base_name} ({base}) equals:\n{table}",
        ui::style_text("Exchange Rates Overview", ui::StyleType::Title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::test_support::sample_catalog;

    #[test]
    fn test_render_rebased_rates() {
        let output = render(&sample_catalog(), "EUR", 12);
        assert!(output.contains("1 Euro (EUR) equals:"));
        // 150 / 0.92
        assert!(output.contains("163.04"));
        // 1 / 0.92
        assert!(output.contains("1.09"));
        assert!(!output.contains("│ EUR"));
    }

    #[test]
    fn test_render_respects_limit() {
        let output = render(&sample_catalog(), "USD", 2);
        assert!(output.contains("Euro"));
        assert!(output.contains("Japanese Yen"));
        assert!(!output.contains("British Pound"));
        assert!(!output.contains("Indian Rupee"));
    }
}

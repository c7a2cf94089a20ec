use super::ui;
use crate::core::currency::CurrencyCatalog;
use crate::core::format::{RATE_DECIMALS, format_max_decimals};
use comfy_table::Cell;

pub fn run(catalog: &CurrencyCatalog) {
    println!("{}", render(catalog));
}

pub fn render(catalog: &CurrencyCatalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Entity"),
        ui::header_cell(&format!("Per 1 {}", catalog.anchor())),
    ]);

    for record in catalog.records() {
        table.add_row(vec![
            Cell::new(&record.code),
            Cell::new(&record.name),
            Cell::new(&record.entity),
            ui::number_cell(&format_max_decimals(record.rate, RATE_DECIMALS)),
        ]);
    }

    format!(
        "{}\n{table}",
        ui::style_text(
            &format!("Tracked currencies, rates as of {}", catalog.date()),
            ui::StyleType::Title
        )
    )
}

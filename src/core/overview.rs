//! Re-basing catalog rates onto a user selected currency.
use crate::core::conversion::usable_rate;
use crate::core::currency::CurrencyCatalog;

#[derive(Debug, Clone, PartialEq)]
pub struct RebasedRate {
    pub code: String,
    pub name: String,
    pub rate: f64,
}

/// Expresses every catalog rate relative to `base`, skipping `base` itself.
///
/// The result keeps catalog order. Callers decide how much of it to show.
pub fn rebase(catalog: &CurrencyCatalog, base: &str) -> Vec<RebasedRate> {
    let base_rate = usable_rate(catalog, base);

    catalog
        .records()
        .iter()
        .filter(|record| record.code != base)
        .map(|record| RebasedRate {
            code: record.code.clone(),
            name: record.name.clone(),
            rate: record.rate / base_rate,
        })
        .collect()
}

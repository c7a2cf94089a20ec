//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod format;
pub mod input;
pub mod log;
pub mod overview;

// Re-export main types for cleaner imports
pub use conversion::{Commission, CommissionKind, ConversionQuote};
pub use currency::{CatalogProvider, CurrencyCatalog, CurrencyRecord, ProviderError};
